//! Install command implementation

use crate::cli::InstallArgs;
use crate::commands::helpers::{self, Context};
use crate::error::Result;
use crate::provision::{InstallOptions, Provisioner};

/// Run install command
pub fn run(ctx: &Context, args: InstallArgs) -> Result<()> {
    let project = helpers::open_project(ctx)?;
    let options = InstallOptions {
        recreate: args.recreate,
        reinstall: args.reinstall,
        upgrade_installer: project.config.install.upgrade_installer && !args.no_upgrade,
        quiet: ctx.quiet,
    };

    let mut reporter = ctx.reporter();
    let report = Provisioner::new(&project, options, reporter.as_mut()).run()?;

    let layout = report.environment.layout();
    let origin = if report.created { "created" } else { "reused" };
    let dependencies = if report.installed {
        "dependencies installed"
    } else {
        "dependencies unchanged"
    };
    reporter.success(&format!(
        "Environment ready at {} ({origin}, Python {}, {dependencies})",
        layout.root().display(),
        report.runtime.version
    ));
    if report.upgrade_warning.is_some() {
        reporter.note("pip was not upgraded; the bundled version was used");
    }
    reporter.note(&format!(
        "Activate manually with: source {}",
        layout.activate_script().display()
    ));
    reporter.note("Start the app with: rnictl start");
    Ok(())
}
