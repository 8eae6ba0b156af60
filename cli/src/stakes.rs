use {
    crate::cli::{
        is_amount, is_index, is_seconds, is_valid_address, is_valid_chain, parse_address,
        parse_chain, CliCommand, CliConfig, CliError, ProcessResult,
    },
    clap::{App, Arg, ArgMatches, SubCommand},
    log::*,
    serde::Serialize,
    std::{
        fmt,
        time::{SystemTime, UNIX_EPOCH},
    },
    tokenfi_staking_client::{
        Address, ChainId, ClientError, PendingTransaction, Stake, StakingContext,
    },
    tokenfi_staking_math::{
        decimals::{format_units, parse_units},
        duration::parse_duration,
        penalty::receive_amount,
        schedule::Remaining,
        view_state::{self, ViewState},
    },
};

// ── CLI Command Enum Variants ───────────────────────────────────────
#[derive(Debug, PartialEq)]
pub enum StakesCliCommand {
    List {
        user: Address,
    },
    Penalty {
        chain: ChainId,
        duration: u64,
        amount: Option<String>,
    },
    SimulateClaim {
        user: Address,
        chain: ChainId,
        stake_index: usize,
    },
}

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliStake {
    pub chain_id: ChainId,
    pub index: usize,
    pub staked: String,
    pub rewards: String,
    pub duration: u64,
    pub duration_label: String,
    pub unlock_timestamp: u64,
    pub unlocked: bool,
    pub remaining: Remaining,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliStakes {
    pub user: Address,
    pub view_state: ViewState,
    pub stakes: Vec<CliStake>,
}

impl fmt::Display for CliStakes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stakes of {}", self.user)?;
        if self.view_state == ViewState::NoStakes {
            writeln!(f, "  No stakes")?;
            return Ok(());
        }
        writeln!(
            f,
            "  {:<6} {:>5} {:>20} {:>16} {:<10} {:<12}",
            "Chain", "Index", "Staked", "Rewards", "Lock", "Unlocks In"
        )?;
        writeln!(f, "  {}", "-".repeat(76))?;
        for stake in &self.stakes {
            let unlocks_in = if stake.unlocked {
                "unlocked".to_string()
            } else {
                format!(
                    "{}y {}m {}d",
                    stake.remaining.years, stake.remaining.months, stake.remaining.days
                )
            };
            writeln!(
                f,
                "  {:<6} {:>5} {:>20} {:>16} {:<10} {:<12}",
                stake.chain_id.to_string(),
                stake.index,
                stake.staked, stake.rewards, stake.duration_label, unlocks_in
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliPenalty {
    pub chain_id: ChainId,
    pub duration: u64,
    pub group: usize,
    pub percentage: String,
    pub amount: Option<String>,
    pub penalty: Option<String>,
    pub receive: Option<String>,
}

impl fmt::Display for CliPenalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Early Unstake Penalty")?;
        writeln!(f, "  Chain:          {}", self.chain_id)?;
        writeln!(f, "  Duration Group: {}", self.group)?;
        writeln!(f, "  Penalty Fee:    {}%", self.percentage)?;
        if let (Some(amount), Some(penalty), Some(receive)) = (&self.amount, &self.penalty, &self.receive) {
            writeln!(f, "  Unstake Amount: {amount}")?;
            writeln!(f, "  Penalty:        {penalty}")?;
            writeln!(f, "  You Receive:    {receive}")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliSimulation {
    pub id: Option<String>,
    pub url: Option<String>,
}

impl fmt::Display for CliSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.id, &self.url) {
            (Some(id), Some(url)) => {
                writeln!(f, "Simulation {id}")?;
                writeln!(f, "  {url}")
            }
            _ => writeln!(f, "Simulation accepted without an id"),
        }
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
pub trait StakesSubCommands {
    fn stakes_subcommands(self) -> Self;
}

impl StakesSubCommands for App<'_, '_> {
    fn stakes_subcommands(self) -> Self {
        self.subcommand(
            SubCommand::with_name("stakes")
                .about("List a wallet's stakes on every chain")
                .arg(
                    Arg::with_name("user")
                        .index(1)
                        .value_name("ADDRESS")
                        .required(true)
                        .validator(is_valid_address)
                        .help("Wallet address"),
                ),
        )
        .subcommand(
            SubCommand::with_name("penalty")
                .about("Show the early-unstake penalty of a lock duration")
                .arg(
                    Arg::with_name("chain")
                        .index(1)
                        .value_name("CHAIN")
                        .required(true)
                        .validator(is_valid_chain)
                        .help("bsc or ethereum"),
                )
                .arg(
                    Arg::with_name("duration")
                        .index(2)
                        .value_name("SECONDS")
                        .required(true)
                        .validator(is_seconds)
                        .help("Lock duration of the stake, in seconds"),
                )
                .arg(
                    Arg::with_name("amount")
                        .index(3)
                        .value_name("TOKENS")
                        .validator(is_amount)
                        .help("Amount to unstake, in whole tokens"),
                ),
        )
        .subcommand(
            SubCommand::with_name("simulate-claim")
                .about("Simulate claiming the rewards of one stake and print a shareable link")
                .arg(
                    Arg::with_name("user")
                        .index(1)
                        .value_name("ADDRESS")
                        .required(true)
                        .validator(is_valid_address)
                        .help("Wallet address that owns the stake"),
                )
                .arg(
                    Arg::with_name("chain")
                        .index(2)
                        .value_name("CHAIN")
                        .required(true)
                        .validator(is_valid_chain)
                        .help("bsc or ethereum"),
                )
                .arg(
                    Arg::with_name("stake_index")
                        .index(3)
                        .value_name("INDEX")
                        .required(true)
                        .validator(is_index)
                        .help("Index of the stake on that chain"),
                ),
        )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
pub fn parse_stakes_command(name: &str, matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    let required = |arg: &str| {
        matches
            .value_of(arg)
            .ok_or_else(|| CliError::BadParameter(format!("missing {arg}")))
    };
    let command = match name {
        "stakes" => StakesCliCommand::List {
            user: parse_address(required("user")?)?,
        },
        "penalty" => StakesCliCommand::Penalty {
            chain: parse_chain(required("chain")?)?,
            duration: parse_number(required("duration")?)?,
            amount: matches.value_of("amount").map(str::to_string),
        },
        "simulate-claim" => StakesCliCommand::SimulateClaim {
            user: parse_address(required("user")?)?,
            chain: parse_chain(required("chain")?)?,
            stake_index: parse_number(required("stake_index")?)?,
        },
        other => return Err(CliError::BadParameter(format!("unknown command '{other}'"))),
    };
    Ok(CliCommand::Stakes(command))
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, CliError> {
    value
        .parse()
        .map_err(|_| CliError::BadParameter(format!("invalid number '{value}'")))
}

// ── Command Processing ──────────────────────────────────────────────
pub async fn process_stakes_command(config: &CliConfig, command: &StakesCliCommand) -> ProcessResult {
    match command {
        StakesCliCommand::List { user } => {
            let ctx = config.context(Some(*user))?;
            let result = process_list(&ctx, config, *user).await;
            ctx.shutdown();
            result
        }
        StakesCliCommand::Penalty {
            chain,
            duration,
            amount,
        } => {
            let ctx = config.context(None)?;
            let result = process_penalty(&ctx, config, *chain, *duration, amount.as_deref()).await;
            ctx.shutdown();
            result
        }
        StakesCliCommand::SimulateClaim {
            user,
            chain,
            stake_index,
        } => {
            let ctx = config.context(Some(*user))?;
            let result = process_simulate_claim(&ctx, config, *user, *chain, *stake_index).await;
            ctx.shutdown();
            result
        }
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

async fn staking_decimals(ctx: &StakingContext, chain_id: ChainId) -> Result<u8, ClientError> {
    let reader = ctx.reader();
    let token = reader.staking_token_address(chain_id).await?;
    Ok(reader.token_info(chain_id, token).await?.decimals)
}

/// Decimals of a chain's staking and rewards tokens, which may differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TokenDecimals {
    staking: u8,
    rewards: u8,
}

async fn token_decimals(ctx: &StakingContext, chain_id: ChainId) -> Result<TokenDecimals, ClientError> {
    let (staking, rewards) = ctx.reader().staking_and_rewards_tokens(chain_id).await?;
    Ok(TokenDecimals {
        staking: staking.decimals,
        rewards: rewards.decimals,
    })
}

fn cli_stake(stake: &Stake, decimals: TokenDecimals, now: u64) -> CliStake {
    let schedule = stake.schedule();
    CliStake {
        chain_id: stake.chain_id,
        index: stake.index,
        staked: format_units(stake.staked_amount, decimals.staking),
        rewards: format_units(stake.rewards, decimals.rewards),
        duration: stake.duration,
        duration_label: parse_duration(stake.duration)
            .map(|label| label.to_string())
            .unwrap_or_else(|| format!("{}s", stake.duration)),
        unlock_timestamp: schedule.unlock_timestamp,
        unlocked: schedule.is_unlocked(now),
        remaining: schedule.remaining(now),
    }
}

async fn process_list(ctx: &StakingContext, config: &CliConfig, user: Address) -> ProcessResult {
    let stakes = match ctx.reader().all_user_stakes(user).await {
        Ok(stakes) => Some(stakes),
        Err(err) => {
            warn!("failed to fetch stakes of {user}: {err}");
            None
        }
    };
    let state = view_state::derive(ctx.wallet().is_connected(), false, stakes.as_deref());
    let now = now();
    let mut rows = Vec::new();
    for stake in stakes.iter().flatten() {
        let decimals = token_decimals(ctx, stake.chain_id).await?;
        rows.push(cli_stake(stake, decimals, now));
    }
    config.output_format.formatted_string(&CliStakes {
        user,
        view_state: state,
        stakes: rows,
    })
}

async fn process_penalty(
    ctx: &StakingContext,
    config: &CliConfig,
    chain_id: ChainId,
    duration: u64,
    amount: Option<&str>,
) -> ProcessResult {
    let penalties = ctx.penalties();
    let fee = penalties.penalty_fee_by_duration(chain_id, duration).await?;
    let mut output = CliPenalty {
        chain_id,
        duration,
        group: fee.group,
        percentage: fee.percentage,
        amount: None,
        penalty: None,
        receive: None,
    };
    if let Some(amount) = amount {
        let decimals = staking_decimals(ctx, chain_id).await?;
        let base_units = parse_units(amount, decimals)?;
        let penalty = penalties
            .calculate_penalty(chain_id, base_units, duration)
            .await?;
        output.amount = Some(format_units(base_units, decimals));
        output.penalty = Some(format_units(penalty, decimals));
        output.receive = Some(format_units(
            receive_amount(base_units, penalty),
            decimals,
        ));
    }
    config.output_format.formatted_string(&output)
}

async fn process_simulate_claim(
    ctx: &StakingContext,
    config: &CliConfig,
    user: Address,
    chain_id: ChainId,
    stake_index: usize,
) -> ProcessResult {
    let mut tx = PendingTransaction::claim_rewards(chain_id, ctx.staking_pool(), stake_index);
    tx.account = Some(user);
    let outcome = ctx.simulate_transaction(&tx).await?;
    config.output_format.formatted_string(&CliSimulation {
        id: outcome.id,
        url: outcome.url,
    })
}
