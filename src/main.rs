//! quiz-admin - inspect and repair quiz save data
//!
//! Operates on the same `QUIZ_SAVE_V1` blob the game writes, stored as a JSON
//! file in a save directory.

#[cfg(not(target_arch = "wasm32"))]
mod admin {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};

    use quiz_progress::platform::{self, FileStore};
    use quiz_progress::{CoinPack, ContentCatalog, Session};

    #[derive(Parser)]
    #[command(name = "quiz-admin")]
    #[command(about = "Inspect and repair quiz progress save data", long_about = None)]
    #[command(version)]
    struct Cli {
        /// Directory holding the save file
        #[arg(long, default_value = ".")]
        save_dir: PathBuf,

        /// Directory of category bank JSON files (enables percentages and level checks)
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Show coins, profile and per-category progress
        Show {
            /// Print the raw save blob instead
            #[arg(long)]
            json: bool,
        },

        /// Clear one category's seen/correct lists
        ResetCategory {
            category_id: String,

            /// Leave the unlocked level where it is
            #[arg(long)]
            keep_watermark: bool,
        },

        /// Clear every category's progress
        ResetAll {
            /// Also zero the coin balance (the reset itself leaves coins alone)
            #[arg(long)]
            drop_coins: bool,
        },

        /// Delete the save and start from defaults
        DeleteAll,

        /// Unlock a category up to a level
        ForceUnlock { category_id: String, level: u32 },

        /// Add (or with a negative amount, remove) coins
        AddCoins {
            #[arg(allow_hyphen_values = true)]
            amount: i64,
        },

        /// Credit a coin pack (small, medium or large), e.g. for a restored purchase
        GrantPack { pack: CoinPack },
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let cli = Cli::parse();

        std::fs::create_dir_all(&cli.save_dir)
            .with_context(|| format!("creating save dir {}", cli.save_dir.display()))?;

        let catalog = match &cli.catalog {
            Some(dir) => ContentCatalog::load_dir(dir)
                .with_context(|| format!("loading catalog from {}", dir.display()))?,
            None => ContentCatalog::new(),
        };
        let mut session = Session::new(catalog, Box::new(FileStore::new(cli.save_dir.clone())));

        match cli.command {
            Commands::Show { json } => show(&mut session, json)?,
            Commands::ResetCategory {
                category_id,
                keep_watermark,
            } => {
                session
                    .progress()
                    .reset_category(&category_id, !keep_watermark);
                println!("Reset '{}'", category_id);
            }
            Commands::ResetAll { drop_coins } => {
                session.progress().reset_all_progress(true);
                if drop_coins {
                    session.economy().set_coins(0);
                }
                println!(
                    "Reset all categories ({} coins)",
                    session.store().data().coins()
                );
            }
            Commands::DeleteAll => {
                session.delete_all();
                println!("Save data deleted");
            }
            Commands::ForceUnlock { category_id, level } => {
                if cli.catalog.is_some() {
                    let count = session.catalog().level_count(&category_id);
                    if count == 0 {
                        bail!("unknown category '{}'", category_id);
                    }
                    if level > count {
                        bail!("'{}' only has {} levels", category_id, count);
                    }
                }
                session.progress().force_unlock_up_to(&category_id, level);
                println!(
                    "'{}' unlocked up to level {}",
                    category_id,
                    session.progress().unlocked_level_count(&category_id)
                );
            }
            Commands::AddCoins { amount } => {
                session.economy().add_coins(amount);
                println!("Balance: {}", session.store().data().coins());
            }
            Commands::GrantPack { pack } => {
                session.purchase_pack(pack);
                println!(
                    "Granted {} pack. Balance: {}",
                    pack.as_str(),
                    session.store().data().coins()
                );
            }
        }
        Ok(())
    }

    fn show(session: &mut Session, json: bool) -> Result<()> {
        if json {
            println!("{}", session.store().to_pretty_json()?);
            return Ok(());
        }

        let data = session.store().data();
        let name = match data.player_name() {
            "" => "(not logged in)",
            name => name,
        };
        println!("Player:       {}", name);
        println!("Coins:        {}", data.coins());
        println!("Signup bonus: {}", if data.signup_bonus_claimed() { "claimed" } else { "available" });
        println!("Schema:       v{}", data.schema_version());

        let rows: Vec<(String, usize, usize, u32)> = data
            .categories()
            .map(|p| {
                (
                    p.category_id().to_string(),
                    p.seen().len(),
                    p.correct().len(),
                    p.unlocked_level_max(),
                )
            })
            .collect();
        if rows.is_empty() {
            println!("No category progress");
            return Ok(());
        }

        println!();
        println!("{:<24} {:>6} {:>8} {:>9} {:>8}", "CATEGORY", "SEEN", "CORRECT", "UNLOCKED", "DONE");
        let has_catalog = !session.catalog().is_empty();
        let tracker = session.progress();
        for (id, seen, correct, unlocked) in rows {
            let done = if has_catalog && tracker.catalog().category(&id).is_some() {
                format!("{:.1}%", tracker.category_percent(&id))
            } else {
                "-".to_string()
            };
            println!("{:<24} {:>6} {:>8} {:>9} {:>8}", id, seen, correct, unlocked, done);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    admin::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven from JS on the web; there is no CLI there
}
