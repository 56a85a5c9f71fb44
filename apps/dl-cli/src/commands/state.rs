// state.rs — `dl state` and `dl triggers`.

use dl_proto::{State, StatusCode, Triggers};

use crate::client::DaemonClient;

pub async fn execute(client: &DaemonClient, json: bool) -> anyhow::Result<()> {
    if json {
        let raw = client.state_raw().await?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }
    let state = client.state().await?;
    print!("{}", render(&state));
    Ok(())
}

pub async fn triggers(client: &DaemonClient) -> anyhow::Result<()> {
    let triggers = client.triggers().await?;
    print!("{}", render_triggers(&triggers));
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Failure codes are tagged with the phase band they belong to.
fn code(code: StatusCode) -> String {
    if code.is_success() {
        format!("{} ({})", code.name(), code.code())
    } else {
        format!("{} ({}) [{:?} error]", code.name(), code.code(), code.band())
    }
}

pub fn render(state: &State) -> String {
    let mut out = String::new();
    let build = &state.build_state;
    out.push_str(&format!(
        "Build         auto={:<4} {}\n",
        on_off(build.auto_trigger),
        code(build.status_code)
    ));
    for (artifact, status) in &build.artifacts {
        out.push_str(&format!("  {:<24} {}\n", artifact, status));
    }

    let deploy = &state.deploy_state;
    out.push_str(&format!(
        "Deploy        auto={:<4} {}  {}\n",
        on_off(deploy.auto_trigger),
        code(deploy.status_code),
        deploy.status
    ));

    let sync = &state.file_sync_state;
    out.push_str(&format!(
        "File sync     auto={:<4} {}\n",
        on_off(sync.auto_trigger),
        sync.status
    ));

    let check = &state.status_check_state;
    out.push_str(&format!(
        "Status check  {}  {}\n",
        code(check.status_code),
        check.status
    ));
    for (resource, status) in &check.resources {
        out.push_str(&format!("  {:<24} {}\n", resource, status));
    }

    if !state.forwarded_ports.is_empty() {
        out.push_str("Forwarded ports\n");
        for (port, fwd) in &state.forwarded_ports {
            out.push_str(&format!(
                "  {:<6} -> {}/{}:{}\n",
                port, fwd.namespace, fwd.resource_name, fwd.target_port
            ));
        }
    }

    if !state.debugging_containers.is_empty() {
        out.push_str("Debugging\n");
        for c in &state.debugging_containers {
            out.push_str(&format!(
                "  {}/{}/{}  {}\n",
                c.namespace, c.pod_name, c.container_name, c.runtime
            ));
        }
    }
    out
}

pub fn render_triggers(triggers: &Triggers) -> String {
    format!(
        "build   {}\nsync    {}\ndeploy  {}\n",
        on_off(triggers.build),
        on_off(triggers.sync),
        on_off(triggers.deploy)
    )
}
