use anyhow::{Context, Result};
use minijinja::Environment;

const REPORT_TEMPLATE: &str = include_str!("report.html");

/// Render the standalone HTML report from a serializable context.
pub fn render_report<S>(context: S) -> Result<String>
where S: serde::Serialize {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("report", REPORT_TEMPLATE).context("Failed to parse report template")?;
    let template = env.get_template("report").context("Failed to get report template")?;
    template.render(context).context("Failed to render report")
}
