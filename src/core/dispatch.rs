//! Fixed-order task dispatch.
//!
//! `plan` turns the action flags into an ordered list of steps without looking
//! at the order they were given on the command line. `execute` runs that plan
//! against a `Toolchain`, stopping at the first fatal failure.
use tracing::{info, warn};

use crate::core::params::ReleaseConfig;
use crate::error::Result;
use crate::io::tools::Toolchain;
use crate::types::{Actions, PackageIndex, Step};

pub fn plan(actions: &Actions) -> Vec<Step> {
    let mut steps = Vec::new();

    if actions.create {
        steps.push(Step::Clean);
        steps.push(Step::Build);
    }
    if actions.upload_test {
        steps.push(Step::Upload(PackageIndex::Test));
    }
    if actions.upload {
        steps.push(Step::Upload(PackageIndex::Production));
    }
    if actions.needs_uninstall() {
        steps.push(Step::Uninstall {
            preparatory: actions.install || actions.install_test,
        });
    }
    if actions.install_test {
        steps.push(Step::Install(PackageIndex::Test));
    }
    if actions.install {
        steps.push(Step::Install(PackageIndex::Production));
    }

    steps
}

fn run_step(step: Step, config: &ReleaseConfig, tools: &Toolchain<'_>) -> Result<()> {
    let dist_dir = config.dist_path();
    match step {
        Step::Clean => tools.builder.clean(&dist_dir),
        Step::Build => tools.builder.build(&dist_dir),
        Step::Upload(index) => tools.uploader.upload(index, &dist_dir),
        Step::Uninstall { preparatory } => {
            match tools.packages.uninstall(&config.package_name) {
                Err(e) if preparatory => {
                    // Already absent is the state the install wants anyway.
                    warn!("Ignoring uninstall failure before install: {}", e);
                    Ok(())
                }
                other => other,
            }
        }
        Step::Install(index) => tools.packages.install(&config.package_name, index),
    }
}

/// Run `steps` in order and return how many ran.
pub fn execute(steps: &[Step], config: &ReleaseConfig, tools: &Toolchain<'_>) -> Result<usize> {
    for (done, step) in steps.iter().enumerate() {
        info!("Step {}/{}: {}", done + 1, steps.len(), step);
        if let Err(e) = run_step(*step, config, tools) {
            warn!("Step '{}' failed: {}", step, e);
            return Err(e);
        }
    }
    Ok(steps.len())
}

/// Plan and execute in one go.
pub fn dispatch(
    actions: &Actions,
    config: &ReleaseConfig,
    tools: &Toolchain<'_>,
) -> Result<usize> {
    if !actions.has_work() {
        info!("Nothing to do");
    }
    let steps = plan(actions);
    execute(&steps, config, tools)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_actions_plan_nothing() {
        assert!(plan(&Actions::default()).is_empty());
        let help_only = Actions {
            help: true,
            ..Default::default()
        };
        assert!(plan(&help_only).is_empty());
    }

    #[test]
    fn full_plan_keeps_fixed_order() {
        let all = Actions {
            help: true,
            create: true,
            upload_test: true,
            upload: true,
            install_test: true,
            install: true,
            uninstall: true,
        };
        assert_eq!(
            plan(&all),
            vec![
                Step::Clean,
                Step::Build,
                Step::Upload(PackageIndex::Test),
                Step::Upload(PackageIndex::Production),
                Step::Uninstall { preparatory: true },
                Step::Install(PackageIndex::Test),
                Step::Install(PackageIndex::Production),
            ]
        );
    }

    #[test]
    fn standalone_uninstall_is_not_preparatory() {
        let actions = Actions {
            uninstall: true,
            ..Default::default()
        };
        assert_eq!(plan(&actions), vec![Step::Uninstall { preparatory: false }]);
    }

    #[test]
    fn install_implies_one_uninstall() {
        let actions = Actions {
            install: true,
            install_test: true,
            ..Default::default()
        };
        let steps = plan(&actions);
        let uninstalls = steps
            .iter()
            .filter(|s| matches!(s, Step::Uninstall { .. }))
            .count();
        assert_eq!(uninstalls, 1);
        assert_eq!(steps[0], Step::Uninstall { preparatory: true });
    }
}
