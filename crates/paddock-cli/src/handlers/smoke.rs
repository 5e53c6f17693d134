//! Smoke command handler

use super::{game_url, runtime};
use crate::commands::SmokeArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};
use paddock::{Browser, PaddockConfig, PaddockError, PaddockResult, SmokeReport, SmokeScenario};

/// Execute the smoke command
pub fn execute_smoke(config: &PaddockConfig, cli: &CliConfig, args: &SmokeArgs) -> CliResult<()> {
    let mut config = config.clone();
    args.browser.apply(&mut config);

    let url = game_url(&config)?;
    let scenario = SmokeScenario::new(config.artifacts_path())
        .with_selector_timeout(args.browser.selector_timeout());
    cli.reporter().info(&format!("Loading {url}"));

    let result = runtime()?.block_on(async {
        let browser = Browser::launch(config.browser.clone()).await?;
        let outcome = match browser.new_page().await {
            Ok(mut page) => scenario.run(&mut page, &url).await,
            Err(e) => Err(e),
        };
        let closed = browser.close().await;
        let report = outcome?;
        closed?;
        Ok::<_, PaddockError>(report)
    });

    render_smoke(cli, result)
}

/// Print a smoke outcome
pub fn render_smoke(cli: &CliConfig, result: PaddockResult<SmokeReport>) -> CliResult<()> {
    let report = result?;
    if cli.output == OutputFormat::Json {
        print_json(&report)?;
    } else {
        cli.reporter().success(&format!(
            "Game page loaded, screenshot: {}",
            report.screenshot.display()
        ));
    }
    Ok(())
}
