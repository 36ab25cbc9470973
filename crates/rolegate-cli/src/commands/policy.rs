//! `rolegate policy show` - Print what a role may reach.

use rolegate_core::RolegateConfig;
use rolegate_policy::{Role, RoleAuthorizationPolicy};

pub fn show(config: &RolegateConfig, role: &str) -> anyhow::Result<()> {
    let policy = RoleAuthorizationPolicy::from_config(&config.servers);
    if Role::recognize(role).is_none() {
        println!(
            "⚠️  '{}' is not a known role; treated as {}",
            role,
            Role::parse(role)
        );
        println!();
    }
    print!("{}", policy.resolve(role).describe());
    Ok(())
}
