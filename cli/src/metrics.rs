use {
    crate::cli::{
        format_percent, is_amount, is_seconds, is_valid_chain, parse_chain, CliCommand,
        CliConfig, CliError, ProcessResult,
    },
    clap::{App, Arg, ArgMatches, SubCommand},
    serde::Serialize,
    std::fmt,
    tokenfi_staking_client::{ChainId, StakingContext, SUPPORTED_CHAINS},
    tokenfi_staking_math::{decimals, duration::parse_duration},
};

/// Decimals of the staking token's on-chain accounting.
const STAKING_TOKEN_DECIMALS: u8 = 9;

// ── CLI Command Enum Variants ───────────────────────────────────────
#[derive(Debug, PartialEq)]
pub enum MetricsCliCommand {
    Duration {
        seconds: u64,
    },
    Apr {
        chain: Option<ChainId>,
        /// Whole-token amount and lock seconds of a prospective stake.
        stake: Option<(String, u64)>,
    },
    Tvl,
}

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliDuration {
    pub seconds: u64,
    pub label: Option<String>,
}

impl fmt::Display for CliDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => writeln!(f, "{label}"),
            None => writeln!(f, "(no label for {} seconds)", self.seconds),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliAprRow {
    pub duration: u64,
    pub label: String,
    pub apr: f64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliAprTable {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rows: Vec<CliAprRow>,
}

impl fmt::Display for CliAprTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "APR on {} ({})", self.chain_name, self.chain_id)?;
        writeln!(f, "  {:<12} {:>14} {:>10}", "Duration", "Seconds", "APR")?;
        writeln!(f, "  {}", "-".repeat(38))?;
        for row in &self.rows {
            writeln!(
                f,
                "  {:<12} {:>14} {:>10}",
                row.label,
                row.duration,
                format_percent(row.apr)
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliAprTables {
    pub chains: Vec<CliAprTable>,
}

impl fmt::Display for CliAprTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, table) in self.chains.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{table}")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliStakeApr {
    pub chain_id: ChainId,
    pub amount: String,
    pub duration: u64,
    pub apr: f64,
}

impl fmt::Display for CliStakeApr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = parse_duration(self.duration)
            .map(|label| label.to_string())
            .unwrap_or_else(|| format!("{}s", self.duration));
        writeln!(
            f,
            "{} tokens locked for {label} on chain {}: {}",
            self.amount,
            self.chain_id,
            format_percent(self.apr)
        )
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliChainValueLocked {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub total_staked: Option<String>,
    pub usd: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliValueLocked {
    pub chains: Vec<CliChainValueLocked>,
    pub total_usd: f64,
}

impl fmt::Display for CliValueLocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Value Locked")?;
        for chain in &self.chains {
            match &chain.usd {
                Some(usd) => writeln!(f, "  {:<18} ${usd}", chain.chain_name)?,
                None => writeln!(f, "  {:<18} unavailable", chain.chain_name)?,
            }
        }
        writeln!(f, "  {:<18} ${:.2}", "Total", self.total_usd)?;
        Ok(())
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait MetricsSubCommands {
    fn metrics_subcommands(self) -> Self;
}

impl MetricsSubCommands for App<'_, '_> {
    fn metrics_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("duration")
                .about("Show the label of a lock duration")
                .arg(
                    Arg::with_name("seconds")
                        .index(1)
                        .value_name("SECONDS")
                        .required(true)
                        .validator(is_seconds)
                        .help("Lock duration in seconds"),
                ),
        )
        .subcommand(
            SubCommand::with_name("apr")
                .about("Show the APR of every lock duration, or of one prospective stake")
                .arg(
                    Arg::with_name("chain")
                        .long("chain")
                        .value_name("CHAIN")
                        .takes_value(true)
                        .validator(is_valid_chain)
                        .help("bsc or ethereum [default: both]"),
                )
                .arg(
                    Arg::with_name("amount")
                        .long("amount")
                        .value_name("TOKENS")
                        .takes_value(true)
                        .requires("lock")
                        .validator(is_amount)
                        .help("Stake amount in whole tokens"),
                )
                .arg(
                    Arg::with_name("lock")
                        .long("lock")
                        .value_name("SECONDS")
                        .takes_value(true)
                        .requires("amount")
                        .validator(is_seconds)
                        .help("Lock duration in seconds"),
                ),
        )
        .subcommand(
            SubCommand::with_name("tvl").about("Show the total value locked on every chain"),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
pub fn parse_metrics_command(name: &str, matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    let command = match name {
        "duration" => MetricsCliCommand::Duration {
            seconds: parse_seconds(matches.value_of("seconds"))?,
        },
        "apr" => {
            let chain = matches.value_of("chain").map(parse_chain).transpose()?;
            let stake = match (matches.value_of("amount"), matches.value_of("lock")) {
                (Some(amount), Some(_)) => {
                    Some((amount.to_string(), parse_seconds(matches.value_of("lock"))?))
                }
                _ => None,
            };
            MetricsCliCommand::Apr { chain, stake }
        }
        "tvl" => MetricsCliCommand::Tvl,
        other => return Err(CliError::BadParameter(format!("unknown command '{other}'"))),
    };
    Ok(CliCommand::Metrics(command))
}

fn parse_seconds(value: Option<&str>) -> Result<u64, CliError> {
    let value = value.ok_or_else(|| CliError::BadParameter("missing duration".to_string()))?;
    value
        .parse()
        .map_err(|_| CliError::BadParameter(format!("invalid duration '{value}'")))
}

// ── Command Processing ──────────────────────────────────────────────
pub async fn process_metrics_command(config: &CliConfig, command: &MetricsCliCommand) -> ProcessResult {
    match command {
        MetricsCliCommand::Duration { seconds } => process_duration(config, *seconds),
        MetricsCliCommand::Apr { chain, stake } => {
            let ctx = config.context(None)?;
            let chains = chain.map(|c| vec![c]).unwrap_or_else(|| SUPPORTED_CHAINS.to_vec());
            let result = match stake {
                Some((amount, lock)) => process_stake_apr(&ctx, config, chains[0], amount, *lock).await,
                None => process_apr_tables(&ctx, config, &chains).await,
            };
            ctx.shutdown();
            result
        }
        MetricsCliCommand::Tvl => {
            let ctx = config.context(None)?;
            let result = process_tvl(&ctx, config).await;
            ctx.shutdown();
            result
        }
    }
}

fn process_duration(config: &CliConfig, seconds: u64) -> ProcessResult {
    let duration = CliDuration {
        seconds,
        label: parse_duration(seconds).map(|label| label.to_string()),
    };
    config.output_format.formatted_string(&duration)
}

async fn process_apr_tables(ctx: &StakingContext, config: &CliConfig, chains: &[ChainId]) -> ProcessResult {
    let mut tables = Vec::with_capacity(chains.len());
    for chain_id in chains {
        let rows = ctx
            .metrics()
            .apr_table(*chain_id)
            .await?
            .into_iter()
            .map(|row| CliAprRow {
                duration: row.duration,
                label: row
                    .label
                    .map(|label| label.to_string())
                    .unwrap_or_else(|| format!("{}s", row.duration)),
                apr: row.apr,
            })
            .collect();
        tables.push(CliAprTable {
            chain_id: *chain_id,
            chain_name: chain_id.name().to_string(),
            rows,
        });
    }
    config
        .output_format
        .formatted_string(&CliAprTables { chains: tables })
}

async fn process_stake_apr(
    ctx: &StakingContext,
    config: &CliConfig,
    chain_id: ChainId,
    amount: &str,
    lock: u64,
) -> ProcessResult {
    let reader = ctx.reader();
    let token = reader.staking_token_address(chain_id).await?;
    let token = reader.token_info(chain_id, token).await?;
    let base_units = decimals::parse_units(amount, token.decimals)?;
    let apr = ctx.metrics().apr_for_stake(chain_id, base_units, lock).await;
    config.output_format.formatted_string(&CliStakeApr {
        chain_id,
        amount: amount.to_string(),
        duration: lock,
        apr,
    })
}

async fn process_tvl(ctx: &StakingContext, config: &CliConfig) -> ProcessResult {
    let summary = ctx.metrics().total_value_locked_all().await;
    let chains = summary
        .chains
        .into_iter()
        .map(|(chain_id, locked)| CliChainValueLocked {
            chain_id,
            chain_name: chain_id.name().to_string(),
            total_staked: locked
                .as_ref()
                .map(|l| decimals::format_units(l.total_staked, STAKING_TOKEN_DECIMALS)),
            usd: locked.map(|l| l.usd),
        })
        .collect();
    config.output_format.formatted_string(&CliValueLocked {
        chains,
        total_usd: summary.total_usd,
    })
}
