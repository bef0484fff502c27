use anyhow::{Context, Result};
use paramforge::{
    builtins::builtin_types,
    cli::config_path_from_args,
    config::Config,
    logging::init_tracing,
    registry::NamedObjectRegistry,
    resolver::{ObjectResolver, describe_types},
};

fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let _logging = init_tracing(&config.logging)?;

    let mut types = builtin_types();
    for (nickname, class_name) in &config.nicknames {
        types.register_nickname(class_name, nickname);
    }
    let named = NamedObjectRegistry::new();
    let classes = types.class_names().collect::<Vec<_>>().join(", ");
    tracing::info!(
        target: "registry",
        classes = %classes,
        nicknames = ?types.nicknames().collect::<Vec<_>>(),
        "types_registered"
    );

    let resolver = ObjectResolver::new(Some(&types), &named, config.resolver.clone());
    let resolved = resolver
        .resolve(&config.parameters)
        .with_context(|| {
            format!(
                "failed to resolve parameters of {} (registered classes: {classes})",
                config_path.display()
            )
        })?;

    for (name, value) in resolved.iter() {
        println!("{name} = {value}");
    }
    for degraded in resolved.degraded() {
        eprintln!(
            "skipped {} ({:?}): {}",
            degraded.parameter, degraded.kind, degraded.message
        );
    }
    print!("\n{}", describe_types(&resolved));

    Ok(())
}
