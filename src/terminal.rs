//! Interactive rounds on stdin/stdout

use anyhow::Result;
use pokemantle::{suggest, Catalog, Entity, GameConfig, GameSession, GuessError, GuessOutcome, SimilarityCache};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::debug;

/// Entries of the final ranking shown when a round ends
const SUMMARY_SIZE: usize = 30;

/// Per-session display settings
#[derive(Debug, Clone, Copy)]
struct RoundOptions {
    suggestion_limit: usize,
    /// Also show species, generation, egg groups and base stats per guess
    details: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    Finished,
    Quit,
}

/// Play rounds until the player quits or stdin closes
pub fn run(catalog: Arc<Catalog>, cache: &SimilarityCache, config: &GameConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut out = io::stdout().lock();

    let mut options = RoundOptions {
        suggestion_limit: config.suggestion_limit,
        details: false,
    };
    let mut round: u64 = 0;
    loop {
        let matrix = cache.get_or_compute(&catalog);
        // successive rounds must not repeat the seeded target
        let seed = config.seed.map(|seed| seed.wrapping_add(round));
        let mut session = GameSession::random(Arc::clone(&catalog), &matrix, seed)?;
        debug!(round, "new round");

        writeln!(
            out,
            "Guess the Pokémon! Type a name, ?text for suggestions, !details to toggle details, !reveal to give up, !quit to exit."
        )?;
        if play_round(&mut session, &mut lines, &mut out, &mut options)? == RoundEnd::Quit {
            return Ok(());
        }
        print_summary(&session, &mut out)?;

        write!(out, "Play again? [y/N] ")?;
        out.flush()?;
        match lines.next() {
            Some(Ok(answer)) if answer.trim().eq_ignore_ascii_case("y") => round += 1,
            _ => return Ok(()),
        }
    }
}

fn play_round<I, W>(
    session: &mut GameSession,
    lines: &mut I,
    out: &mut W,
    options: &mut RoundOptions,
) -> Result<RoundEnd>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    loop {
        write!(out, "guess #{}> ", session.attempts() + 1)?;
        out.flush()?;
        let Some(line) = lines.next() else {
            return Ok(RoundEnd::Quit);
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "!quit" {
            return Ok(RoundEnd::Quit);
        }
        if input == "!details" {
            options.details = !options.details;
            writeln!(out, "Details {}.", if options.details { "on" } else { "off" })?;
            print_history(session, out, options.details)?;
            continue;
        }
        if input == "!reveal" {
            let solution = session.reveal()?;
            writeln!(out, "The answer was {} ({}).", solution.display_name, solution.name)?;
            return Ok(RoundEnd::Finished);
        }
        if let Some(partial) = input.strip_prefix('?') {
            let hits = suggest(partial, session.catalog(), options.suggestion_limit);
            if hits.is_empty() {
                writeln!(out, "No suggestions for \"{}\".", partial.trim())?;
            } else {
                let names: Vec<&str> = hits.iter().map(|e| e.display_name()).collect();
                writeln!(out, "{}", names.join(", "))?;
            }
            continue;
        }

        match session.submit(input) {
            Ok(GuessOutcome::Solved(record)) => {
                let attempts = record.attempt.unwrap_or_default();
                writeln!(
                    out,
                    "Correct! It was {} ({}), found in {} {}.",
                    record.display_name,
                    record.name,
                    attempts,
                    if attempts == 1 { "attempt" } else { "attempts" }
                )?;
                return Ok(RoundEnd::Finished);
            }
            Ok(outcome) => {
                if let GuessOutcome::Repeated(record) = &outcome {
                    writeln!(out, "Already guessed {}.", record.display_name)?;
                }
                print_history(session, out, options.details)?;
            }
            Err(GuessError::NotFound(_)) => {
                writeln!(out, "\"{}\" is not in the catalog. Try ?{} for suggestions.", input, input)?;
            }
            Err(GuessError::RoundOver) => return Ok(RoundEnd::Finished),
        }
    }
}

fn print_history<W: Write>(session: &GameSession, out: &mut W, details: bool) -> io::Result<()> {
    if session.history().is_empty() {
        return Ok(());
    }
    writeln!(
        out,
        "  #  {:<20} {:>6} {:>6}  {:<18} {:>7} {:>8}",
        "guess", "rank", "score", "types", "height", "weight"
    )?;
    for record in session.display_order() {
        let Some(entity) = session.catalog().get(record.index) else {
            continue;
        };
        writeln!(
            out,
            "{:>3}  {:<20} {:>6} {:>6}  {:<18} {:>6}m {:>6}kg",
            record.attempt.map_or_else(|| "-".to_string(), |a| a.to_string()),
            record.display_name,
            record.rank,
            record.score,
            type_label(entity),
            entity.height_m,
            entity.weight_kg
        )?;
        if details {
            print_details(entity, out)?;
        }
    }
    Ok(())
}

fn type_label(entity: &Entity) -> String {
    let types = entity.types();
    if types.is_empty() {
        return "-".to_string();
    }
    types.iter().map(|t| t.as_str()).collect::<Vec<_>>().join("/")
}

fn print_details<W: Write>(entity: &Entity, out: &mut W) -> io::Result<()> {
    let eggs = entity.egg_groups();
    writeln!(
        out,
        "       species: {}  generation: {}  egg groups: {}",
        entity.species.as_deref().unwrap_or("-"),
        entity.generation.as_deref().unwrap_or("-"),
        if eggs.is_empty() { "-".to_string() } else { eggs.join(", ") }
    )?;
    writeln!(
        out,
        "       hp {} / atk {} / def {} / spa {} / spd {} / spe {} / total {}",
        entity.hp,
        entity.attack,
        entity.defense,
        entity.sp_attack,
        entity.sp_defense,
        entity.speed,
        entity.total_points
    )
}

fn print_summary<W: Write>(session: &GameSession, out: &mut W) -> io::Result<()> {
    writeln!(out, "Closest to the answer:")?;
    for (position, entry) in session.ranking().top(SUMMARY_SIZE).iter().enumerate() {
        writeln!(
            out,
            "{:>4}  {:<20} {:>3}",
            position + 1,
            entry.display_name,
            entry.score
        )?;
    }
    Ok(())
}
