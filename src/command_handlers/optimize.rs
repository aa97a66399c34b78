use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use fs_err as fs;

use super::Context;
use crate::config::KilnConfig;
use crate::errors::KilnError;
use crate::optimize_client::{AlUlsClient, OptimizeMethod, OptimizeRequest};

pub struct OptimizeArgs {
    pub json: Option<String>,
    pub method: Option<OptimizeMethod>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub target_entropy: Option<f64>,
}

pub fn run_optimize(args: OptimizeArgs, cfg: &KilnConfig, ctx: &mut Context) -> Result<()> {
    let path = args
        .json
        .as_deref()
        .map(|p| ctx.cwd.join(p))
        .filter(|p| p.is_file())
        .ok_or_else(|| KilnError::input("Provide --json file"))?;
    let matrix = load_matrix(&path)?;

    let settings = cfg.optimize.clone().with_env_overrides()?;
    let host = args.host.unwrap_or(settings.host);
    let port = args.port.unwrap_or(settings.port);
    let req = OptimizeRequest {
        matrix,
        method: args.method.unwrap_or(settings.method),
        target_entropy: args.target_entropy,
    };

    let client = AlUlsClient::new(&host, port, Duration::from_secs(settings.timeout_secs))?;
    let res = client.optimize(&req)?;
    println!("{}", serde_json::to_string_pretty(&res)?);
    Ok(())
}

/// Read `{"matrix": [[...], ...]}` from `path`.
pub fn load_matrix(path: &Path) -> Result<Vec<Vec<f64>>, KilnError> {
    let data = fs::read_to_string(path).map_err(|e| KilnError::input(e.to_string()))?;
    let payload: serde_json::Value = serde_json::from_str(&data)
        .map_err(|e| KilnError::input(format!("{}: invalid JSON: {e}", path.display())))?;
    let matrix = payload
        .get("matrix")
        .cloned()
        .ok_or_else(|| KilnError::input(format!("{}: missing \"matrix\"", path.display())))?;
    serde_json::from_value(matrix).map_err(|e| {
        KilnError::input(format!(
            "{}: \"matrix\" must be an array of numeric rows: {e}",
            path.display()
        ))
    })
}
