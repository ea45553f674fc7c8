//! `alerts` and `alert` commands

use tracing::instrument;

use crate::application::ApplicationError;
use crate::cli::args::{
    AlertCommands, AlertsArgs, ConditionCommands, ConditionSetArgs, SettingArgs, SettingCommands,
};
use crate::cli::error::CliResult;
use crate::cli::render::Renderer;
use crate::domain::{check_required, AlertConditionFlags, AlertConditionPayload, AlertView};
use crate::infrastructure::di::ServiceContainer;

#[instrument(level = "debug", skip(container, out))]
pub fn list(container: &ServiceContainer, out: &mut Renderer, args: &AlertsArgs) -> CliResult<()> {
    if args.live {
        return live(container, out);
    }
    let alerts: Vec<AlertView> = container
        .client
        .alerts(args.page_size)?
        .into_iter()
        .map(AlertView::from)
        .collect();
    out.list(&alerts)
}

/// Print every alert as it arrives until the server closes the stream.
fn live(container: &ServiceContainer, out: &mut Renderer) -> CliResult<()> {
    let mut render_error = None;
    let result = container.client.alerts_live(&mut |alert| {
        out.stream_item(&AlertView::from(alert)).map_err(|e| {
            let failure = ApplicationError::OperationFailed {
                context: "print alert".to_string(),
                source: e.to_string().into(),
            };
            render_error = Some(e);
            failure
        })
    });
    match (result, render_error) {
        (_, Some(e)) => Err(e),
        (result, None) => Ok(result?),
    }
}

#[instrument(level = "debug", skip(container, out))]
pub fn execute(container: &ServiceContainer, out: &mut Renderer, command: &AlertCommands) -> CliResult<()> {
    match command {
        // nested category map does not fit a table
        AlertCommands::Settings => out.json(&container.client.alert_settings()?),
        AlertCommands::Setting(args) => setting(container, out, args),
    }
}

fn setting(container: &ServiceContainer, out: &mut Renderer, args: &SettingArgs) -> CliResult<()> {
    match &args.command {
        Some(SettingCommands::Conditions { alert }) => {
            let id = required_alert(alert.or(args.id))?;
            out.object(&container.client.alert_setting_conditions(id)?)
        }
        Some(SettingCommands::Condition { command }) => condition(container, out, command, args.id),
        None => {
            check_required(&[("id", &args.id)])?;
            let id = args.id.unwrap_or_default();
            match args.enable {
                Some(enable) => {
                    container.client.enable_alert_setting(id, enable)?;
                    let state = if enable { "enabled" } else { "disabled" };
                    out.info(format!("Alert setting [{id}] {state}"))
                }
                None => out.object(&container.client.alert_setting(id)?),
            }
        }
    }
}

fn condition(
    container: &ServiceContainer,
    out: &mut Renderer,
    command: &ConditionCommands,
    parent_id: Option<i64>,
) -> CliResult<()> {
    match command {
        ConditionCommands::Set(args) => set_conditions(container, out, args, parent_id),
        ConditionCommands::Delete { alert, condition } => {
            let alert = alert.or(parent_id);
            check_required(&[("alert", &alert), ("condition", condition)])?;
            let id = alert.unwrap_or_default();
            let uuid = condition.as_deref().unwrap_or_default();
            container.client.delete_alert_setting_condition(id, uuid)?;
            out.info(format!("Condition [{uuid}] of alert setting [{id}] deleted"))
        }
    }
}

fn set_conditions(
    container: &ServiceContainer,
    out: &mut Renderer,
    args: &ConditionSetArgs,
    parent_id: Option<i64>,
) -> CliResult<()> {
    let flags = AlertConditionFlags {
        alert: args.alert.or(parent_id),
        condition: args.condition.clone(),
    };
    let payload: AlertConditionPayload = container.payloads.resolve(args.file.as_deref(), &flags)?;
    let conditions = payload.all_conditions();
    check_required(&[("alert", &payload.alert_id), ("condition", &conditions)])?;

    for condition in &conditions {
        container
            .client
            .upsert_alert_setting_condition(payload.alert_id, condition)?;
        out.info(format!(
            "Condition [id={}] added: {condition}",
            payload.alert_id
        ))?;
    }
    Ok(())
}

fn required_alert(alert: Option<i64>) -> CliResult<i64> {
    check_required(&[("alert", &alert)])?;
    Ok(alert.unwrap_or_default())
}
