use {
    crate::{cli::is_valid_address, metrics::MetricsSubCommands, stakes::StakesSubCommands},
    clap::{crate_description, crate_name, crate_version, App, AppSettings, Arg},
};

pub fn get_clap_app<'ab, 'v>(name: &str, about: &'ab str, version: &'v str) -> App<'ab, 'v> {
    App::new(name)
        .about(about)
        .version(version)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("FILEPATH")
                .takes_value(true)
                .global(true)
                .help("Configuration file to use [default: ~/.config/tokenfi-staking/config.yml]"),
        )
        .arg(
            Arg::with_name("staking_pool")
                .long("pool")
                .value_name("ADDRESS")
                .takes_value(true)
                .global(true)
                .validator(is_valid_address)
                .help("Staking pool contract, overriding the configured one"),
        )
        .arg(
            Arg::with_name("output_format")
                .long("output")
                .value_name("FORMAT")
                .takes_value(true)
                .global(true)
                .possible_values(&["display", "json", "json-compact"])
                .help("Return information in specified output format"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Show debug logging"),
        )
        .metrics_subcommands()
        .stakes_subcommands()
}

pub fn app<'ab, 'v>() -> App<'ab, 'v> {
    get_clap_app(crate_name!(), crate_description!(), crate_version!())
}
