use {
    log::*,
    std::{path::PathBuf, process::exit},
    tokenfi_staking_cli::{
        clap_app::app,
        cli::{parse_address, CliConfig, CliError, OutputFormat},
        global_present, global_value, parse_command, process_command,
    },
    tokenfi_staking_client::{config::default_config_path, ClientConfig},
};

fn load_config(config_file: Option<&str>) -> Result<ClientConfig, CliError> {
    let path = config_file
        .map(PathBuf::from)
        .or_else(default_config_path)
        .ok_or_else(|| CliError::BadParameter("unable to locate a config file".to_string()))?;
    debug!("loading config from {}", path.display());
    Ok(ClientConfig::load_or_default(path)?)
}

fn run() -> Result<String, CliError> {
    let matches = app().get_matches();

    let default_level = if global_present(&matches, "verbose") {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut client = load_config(global_value(&matches, "config_file"))?;
    if let Some(pool) = global_value(&matches, "staking_pool") {
        client.staking_pool = Some(parse_address(pool)?);
    }
    let config = CliConfig {
        client,
        output_format: OutputFormat::from_matches(global_value(&matches, "output_format")),
    };
    let command = parse_command(&matches)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(process_command(&config, &command))
}

fn main() {
    match run() {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            exit(1);
        }
    }
}
