use lambdeploy::Platform;
use lambdeploy_core::BuildInfo;

use super::Context;

pub fn deploy(ctx: &Context, build: &BuildInfo, format: &str) -> anyhow::Result<()> {
    let platform = ctx.platform()?;
    match platform.deploy(&ctx.app, build) {
        Ok(deployment) => {
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&deployment)?);
            } else {
                println!("✓ Deployed {} ({})", ctx.app.app, build.build_id);
                println!("  Version: {deployment}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Deploy failed: {e}");
            Err(e.into())
        }
    }
}
