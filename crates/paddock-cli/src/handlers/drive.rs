//! Drive command handler

use super::{game_url, runtime};
use crate::commands::DriveArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};
use paddock::{Browser, DriveReport, DriveScenario, PaddockConfig, PaddockError, PaddockResult};

/// Execute the drive command
pub fn execute_drive(config: &PaddockConfig, cli: &CliConfig, args: &DriveArgs) -> CliResult<()> {
    let mut config = config.clone();
    args.browser.apply(&mut config);

    let url = game_url(&config)?;
    let scenario = DriveScenario::new(config.artifacts_path())
        .with_selector_timeout(args.browser.selector_timeout());
    cli.reporter().info(&format!("Driving {url}"));

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

    render_drive(cli, result)
}

/// Print a drive outcome and turn failures into the command error
pub fn render_drive(cli: &CliConfig, result: PaddockResult<DriveReport>) -> CliResult<()> {
    let reporter = cli.reporter();
    match result {
        Ok(report) => {
            if cli.output == OutputFormat::Json {
                print_json(&report)?;
            } else {
                let (dx, dy) = report.during.delta(&report.initial);
                reporter.success(&format!(
                    "Drive test passed: speed {:.1}, moved ({dx:.2}, {dy:.2})",
                    report.speed
                ));
                reporter.info(&format!("Screenshot: {}", report.screenshot.display()));
            }
            Ok(())
        }
        Err(err) => {
            if err.is_assertion() {
                reporter.failure(&format!("Drive test failed: {err}"));
            }
            Err(err.into())
        }
    }
}
