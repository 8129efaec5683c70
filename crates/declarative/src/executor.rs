//! Reconciliation engine - observes, decides, and runs at most one action

use crate::context::{ApplyContext, Declaration};
use crate::error::ReconcileError;
use crate::planner::{Action, Decision, plan};
use crate::resource::Resource;
use crate::types::{ActionOutcome, ReconciliationResult};

/// Reconcile a resource to the declared state
///
/// Observes the installed state fresh, plans the transition, and runs the
/// chosen lifecycle action unless `ctx.check_mode` is set. In check mode
/// no action is invoked and `changed` reports what would have happened.
///
/// # Errors
///
/// Returns a [`ReconcileError`] for every terminal failure: impossible
/// transitions, a missing artifact, probe failures, and actions that
/// could not run or returned nonzero.
pub fn reconcile<R>(
    resource: &R,
    declaration: &Declaration,
    ctx: ApplyContext,
) -> Result<ReconciliationResult, ReconcileError>
where
    R: Resource + ?Sized,
{
    let subject = resource.description();

    let observed = resource
        .current_state()
        .map_err(|e| ReconcileError::Probe {
            message: format!("Could not detect {subject}"),
            detail: format!("{e:#}"),
        })?;
    log::debug!(
        "{}: observed {}",
        resource.id(),
        observed.version().unwrap_or("absent")
    );

    let action = match plan(declaration.state, &observed, &subject) {
        Decision::Converged { message } => {
            log::info!("{}: {}", resource.id(), message);
            return Ok(ReconciliationResult::unchanged(message));
        }
        Decision::Reject { message } => return Err(ReconcileError::Precondition { message }),
        Decision::Run(action) => action,
    };

    if ctx.check_mode {
        log::info!("{}: check mode, skipping {}", resource.id(), action.verb());
        return Ok(ReconciliationResult::would_change(action.would_message(&subject)));
    }

    log::info!("{}: running {}", resource.id(), action.verb());
    let outcome = run_action(resource, action, declaration)?;

    if outcome.is_success() {
        Ok(ReconciliationResult::changed(
            action.success_message(&subject),
            outcome,
        ))
    } else {
        log::warn!(
            "{}: {} returned rc={}",
            resource.id(),
            action.verb(),
            outcome.rc
        );
        Err(ReconcileError::ActionFailed {
            message: action.failure_message().to_string(),
            outcome,
        })
    }
}

/// Run the selected action
fn run_action<R>(
    resource: &R,
    action: Action,
    declaration: &Declaration,
) -> Result<ActionOutcome, ReconcileError>
where
    R: Resource + ?Sized,
{
    let result = match action {
        Action::Install(_) => {
            let artifact = declaration.artifact.as_deref().ok_or_else(|| {
                ReconcileError::Precondition {
                    message: format!("installer_path is required to {}", action.verb()),
                }
            })?;
            resource.install(artifact)
        }
        Action::Uninstall => resource.uninstall(),
    };

    result.map_err(|e| ReconcileError::Execution {
        message: action.failure_message().to_string(),
        detail: format!("{e:#}"),
    })
}
