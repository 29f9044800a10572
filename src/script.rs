//! Session scripts: a plain-text list of table intents
//!
//! ```text
//! # setup
//! card bears hand Grizzly Bears|Type:Creature — Bear|Cost:{1}{G}|Colors:G
//! card forest hand Forest|Type:Basic Land — Forest
//!
//! move forest lands
//! move bears battlefield 0 3
//! tap forest
//! next
//! show
//! ```
//!
//! Cards are referenced by the alias given in their `card` line, by instance ID
//! (`#4`), or by name with underscores for spaces (`grizzly_bears`).

use crate::core::{CardMeta, Color, InstanceId, Position};
use crate::game::{Intent, IntentDispatcher, TableView, Tabletop, VerbosityLevel};
use crate::zones::Zone;
use crate::{Result, TabletopError};
use rustc_hash::FxHashMap;
use std::path::Path;

/// How a script line names a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRef {
    Alias(String),
    Id(InstanceId),
}

/// One parsed script command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    CreateCard {
        alias: String,
        zone: Zone,
        meta: CardMeta,
    },
    Move {
        card: CardRef,
        zone: Zone,
        position: Option<Position>,
    },
    Tap(CardRef),
    Attach {
        child: CardRef,
        parent: CardRef,
    },
    Detach(CardRef),
    Select(CardRef),
    Target(CardRef),
    Cancel,
    Next,
    Skip,
    Pass,
    /// Record a view of the table
    Show,
    /// Verify the table invariants
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the source
    pub line: usize,
    pub command: ScriptCommand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionScript {
    pub lines: Vec<ScriptLine>,
}

fn parse_error(line: usize, message: impl Into<String>) -> TabletopError {
    TabletopError::ParseError {
        line,
        message: message.into(),
    }
}

/// Split off the first whitespace-delimited word
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim_start()),
        None => (text, ""),
    }
}

fn parse_card_ref(token: &str) -> std::result::Result<CardRef, String> {
    if let Some(num) = token.strip_prefix('#') {
        return num
            .parse()
            .map(|id| CardRef::Id(InstanceId::new(id)))
            .map_err(|_| format!("invalid card id '{token}'"));
    }
    if token.is_empty() {
        return Err("missing card reference".to_string());
    }
    Ok(CardRef::Alias(token.to_string()))
}

/// Parse card notation like "Grizzly Bears|Type:Creature — Bear|Cost:{1}{G}|Colors:G"
pub fn parse_card_notation(notation: &str) -> std::result::Result<CardMeta, String> {
    let mut parts = notation.split('|');
    let name = parts.next().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err("card notation needs a name".to_string());
    }

    let mut meta = CardMeta::new(name);
    for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once(':') else {
            return Err(format!("expected Key:Value, found '{part}'"));
        };
        let value = value.trim();

        meta = match key.trim().to_lowercase().as_str() {
            "type" => meta.with_type_line(value),
            "cost" => meta.with_mana_cost(value),
            "text" => meta.with_oracle_text(value),
            "image" => meta.with_image(value),
            "catalog" => meta.with_catalog_id(value),
            "colors" => {
                let colors = value
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| Color::from_symbol(c).ok_or_else(|| format!("unknown color '{c}'")))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                meta.with_colors(colors)
            }
            other => return Err(format!("unknown card property '{other}'")),
        };
    }
    Ok(meta)
}

fn parse_command(text: &str) -> std::result::Result<ScriptCommand, String> {
    let (verb, rest) = split_word(text);
    let args: Vec<&str> = rest.split_whitespace().collect();

    let expect_args = |count: usize| -> std::result::Result<(), String> {
        if args.len() == count {
            Ok(())
        } else {
            Err(format!("'{verb}' takes {count} argument(s), found {}", args.len()))
        }
    };
    let zone = |token: &str| token.parse::<Zone>().map_err(|e| e.to_string());

    let command = match verb.to_lowercase().as_str() {
        "card" => {
            let (alias, rest) = split_word(rest);
            let (zone_token, notation) = split_word(rest);
            if alias.is_empty() || zone_token.is_empty() || notation.is_empty() {
                return Err("usage: card <alias> <zone> <notation>".to_string());
            }
            if alias.starts_with('#') {
                return Err(format!("alias '{alias}' may not start with '#'"));
            }
            ScriptCommand::CreateCard {
                alias: alias.to_string(),
                zone: zone(zone_token)?,
                meta: parse_card_notation(notation)?,
            }
        }
        "move" => {
            let position = match args.len() {
                2 => None,
                4 => {
                    let row = args[2]
                        .parse()
                        .map_err(|_| format!("invalid row '{}'", args[2]))?;
                    let col = args[3]
                        .parse()
                        .map_err(|_| format!("invalid column '{}'", args[3]))?;
                    Some(Position::new(row, col))
                }
                _ => return Err("usage: move <card> <zone> [<row> <col>]".to_string()),
            };
            ScriptCommand::Move {
                card: parse_card_ref(args[0])?,
                zone: zone(args[1])?,
                position,
            }
        }
        "tap" => {
            expect_args(1)?;
            ScriptCommand::Tap(parse_card_ref(args[0])?)
        }
        "attach" => {
            expect_args(2)?;
            ScriptCommand::Attach {
                child: parse_card_ref(args[0])?,
                parent: parse_card_ref(args[1])?,
            }
        }
        "detach" => {
            expect_args(1)?;
            ScriptCommand::Detach(parse_card_ref(args[0])?)
        }
        "select" => {
            expect_args(1)?;
            ScriptCommand::Select(parse_card_ref(args[0])?)
        }
        "target" => {
            expect_args(1)?;
            ScriptCommand::Target(parse_card_ref(args[0])?)
        }
        "cancel" => {
            expect_args(0)?;
            ScriptCommand::Cancel
        }
        "next" | "advance" => {
            expect_args(0)?;
            ScriptCommand::Next
        }
        "skip" => {
            expect_args(0)?;
            ScriptCommand::Skip
        }
        "pass" => {
            expect_args(0)?;
            ScriptCommand::Pass
        }
        "show" => {
            expect_args(0)?;
            ScriptCommand::Show
        }
        "check" => {
            expect_args(0)?;
            ScriptCommand::Check
        }
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(command)
}

impl SessionScript {
    pub fn parse(source: &str) -> Result<Self> {
        let mut lines = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let command = parse_command(text).map_err(|msg| parse_error(idx + 1, msg))?;
            lines.push(ScriptLine {
                line: idx + 1,
                command,
            });
        }
        Ok(SessionScript { lines })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Tally of a script run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Intents the table carried out
    pub applied: usize,
    /// Intents the table refused (state left unchanged)
    pub rejected: usize,
    /// Views recorded by `show` lines
    pub views: Vec<TableView>,
}

/// Plays a session script against a table
pub struct ScriptRunner {
    table: Tabletop,
    dispatcher: IntentDispatcher,
    aliases: FxHashMap<String, InstanceId>,
    strict: bool,
}

impl ScriptRunner {
    pub fn new(table: Tabletop, dispatcher: IntentDispatcher) -> Self {
        ScriptRunner {
            table,
            dispatcher,
            aliases: FxHashMap::default(),
            strict: false,
        }
    }

    /// Stop at the first refused intent instead of counting it
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn table(&self) -> &Tabletop {
        &self.table
    }

    pub fn into_table(self) -> Tabletop {
        self.table
    }

    fn resolve(&self, line: usize, card: &CardRef) -> Result<InstanceId> {
        match card {
            CardRef::Id(id) => Ok(*id),
            CardRef::Alias(alias) => self
                .aliases
                .get(alias)
                .copied()
                .or_else(|| {
                    self.table
                        .registry()
                        .find_by_name(&alias.replace('_', " "))
                        .map(|c| c.id)
                })
                .ok_or_else(|| parse_error(line, format!("unknown card '{alias}'"))),
        }
    }

    fn to_intent(&self, line: usize, command: &ScriptCommand) -> Result<Option<Intent>> {
        let intent = match command {
            ScriptCommand::Move {
                card,
                zone,
                position,
            } => Intent::MoveCard {
                card: self.resolve(line, card)?,
                zone: *zone,
                position: *position,
            },
            ScriptCommand::Tap(card) => Intent::TapCard(self.resolve(line, card)?),
            ScriptCommand::Attach { child, parent } => Intent::Attach {
                child: self.resolve(line, child)?,
                parent: self.resolve(line, parent)?,
            },
            ScriptCommand::Detach(card) => Intent::Detach(self.resolve(line, card)?),
            ScriptCommand::Select(card) => Intent::StartAttachment(self.resolve(line, card)?),
            ScriptCommand::Target(card) => Intent::CompleteAttachment(self.resolve(line, card)?),
            ScriptCommand::Cancel => Intent::CancelAttachment,
            ScriptCommand::Next => Intent::AdvanceStep,
            ScriptCommand::Skip => Intent::SkipToEnd,
            ScriptCommand::Pass => Intent::PassToNextTurn,
            ScriptCommand::CreateCard { .. } | ScriptCommand::Show | ScriptCommand::Check => {
                return Ok(None)
            }
        };
        Ok(Some(intent))
    }

    pub fn run(&mut self, script: &SessionScript) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for line in &script.lines {
            match &line.command {
                ScriptCommand::CreateCard { alias, zone, meta } => {
                    if self.aliases.contains_key(alias) {
                        return Err(parse_error(line.line, format!("alias '{alias}' already used")));
                    }
                    let id = self.table.add_card(meta.clone(), *zone)?;
                    self.aliases.insert(alias.clone(), id);
                }
                ScriptCommand::Show => summary.views.push(TableView::capture(&self.table)),
                ScriptCommand::Check => self.table.check_invariants()?,
                command => {
                    let Some(intent) = self.to_intent(line.line, command)? else {
                        continue;
                    };
                    match self.dispatcher.dispatch(&mut self.table, intent) {
                        Ok(()) => summary.applied += 1,
                        Err(err) if err.is_rejection() && !self.strict => {
                            summary.rejected += 1;
                            self.table.logger.event(
                                VerbosityLevel::Verbose,
                                "script",
                                format_args!("line {} skipped", line.line),
                            );
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        self.table.logger.event(
            VerbosityLevel::Minimal,
            "script",
            format_args!(
                "{} intents applied, {} rejected",
                summary.applied, summary.rejected
            ),
        );
        Ok(summary)
    }
}
