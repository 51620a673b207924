use lambdeploy::Configurable;
use lambdeploy_core::ConfigVar;

use super::Context;

pub fn set(ctx: &Context, name: &str, value: &str) -> anyhow::Result<()> {
    let platform = ctx.platform()?;
    platform.config_set(&ctx.app, &ConfigVar::new(name, value))?;
    println!("✓ Set {name} on {}", ctx.app.app);
    Ok(())
}

pub fn get(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let platform = ctx.platform()?;
    let var = platform.config_get(&ctx.app, name)?;
    println!("{}", var.value);
    Ok(())
}
