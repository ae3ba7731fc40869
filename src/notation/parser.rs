//! Movetext parser
//!
//! Reads a PGN-style game record into a [`ParsedGame`]: an optional tag
//! block, the main line with its variations nested under the moves they
//! are alternatives to, and a result token. No chess rules are involved
//! here; SAN is kept verbatim and only resolved later by the replayer.
//!
//! # Grammar
//!
//! ```text
//! [Event "Casual"]                 tag pairs, opaque, order kept
//! 1. e4 e5 2. Nf3 (2. Bc4 Nf6) 2... Nc6 {comment} $1 1-0
//! ```
//!
//! Skipped without effect: `{...}` comments, `;` comments to end of line,
//! `%` escape lines, NAGs (`$n`) and free-standing glyphs like `!?` or `+-`.
//!
//! # Variation origins
//!
//! A variation written after a move is an alternative to that move, so its
//! first move normally has the same ply. A move number written in front of
//! the variation's first move overrides that: `(1. d4)` after the last main
//! line move still means an alternative to White's first move. Move numbers
//! anywhere else only label moves and are not checked, though a number
//! that names no ply at all, such as `0.`, is an error. So are null moves.

use crate::game::components::PieceColor;
use crate::game::types::{color_for_ply, move_number_for_ply, ply_for};
use crate::notation::error::{ParseError, ParseResult};
use crate::notation::outcome::GameOutcome;
use serde::{Deserialize, Serialize};

/// One `[Name "Value"]` pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A game record before replay
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedGame {
    pub tags: Vec<Tag>,
    pub mainline: Vec<ParsedMove>,
    /// Variations written before any main line move
    pub root_variations: Vec<ParsedVariation>,
    /// `None` when the movetext ends without a result token
    pub result: Option<GameOutcome>,
}

impl ParsedGame {
    /// Total number of moves, variations included
    pub fn move_count(&self) -> usize {
        fn count(moves: &[ParsedMove]) -> usize {
            moves
                .iter()
                .map(|m| 1 + m.variations.iter().map(|v| count(&v.moves)).sum::<usize>())
                .sum()
        }
        count(&self.mainline)
            + self
                .root_variations
                .iter()
                .map(|v| count(&v.moves))
                .sum::<usize>()
    }
}

/// A SAN move and the variations offering alternatives to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMove {
    pub san: String,
    pub ply: u32,
    pub variations: Vec<ParsedVariation>,
}

impl ParsedMove {
    pub fn move_number(&self) -> u32 {
        move_number_for_ply(self.ply)
    }

    pub fn color(&self) -> PieceColor {
        color_for_ply(self.ply)
    }
}

/// A parenthesized line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedVariation {
    /// Ply of the variation's first move; its anchor sits one ply earlier
    pub origin_ply: u32,
    pub moves: Vec<ParsedMove>,
}

impl ParsedVariation {
    pub fn anchor_ply(&self) -> u32 {
        self.origin_ply.saturating_sub(1)
    }
}

/// Parse a complete game record
pub fn parse_game(text: &str) -> ParseResult<ParsedGame> {
    let tokens = Lexer::new(text).tokenize()?;

    let mut game = ParsedGame::default();
    let mut stack = vec![Frame::mainline()];

    for (offset, token) in tokens {
        match token {
            Token::Tag(tag) => {
                if stack.len() > 1 || !stack[0].moves.is_empty() {
                    return Err(ParseError::UnexpectedToken {
                        token: format!("[{} \"{}\"]", tag.name, tag.value),
                        offset,
                    });
                }
                game.tags.push(tag);
            }
            Token::MoveNumber { number, color } => {
                if let Some(frame) = stack.last_mut() {
                    frame.declared = ply_for(number, color);
                }
            }
            Token::San(san) => {
                if let Some(frame) = stack.last_mut() {
                    frame.push(san, offset)?;
                }
            }
            Token::Open => {
                let depth = stack.len();
                let Some(frame) = stack.last() else {
                    return Err(ParseError::UnbalancedParen { offset });
                };
                let start_ply = match frame.moves.last() {
                    Some(last) => last.ply,
                    None if depth == 1 => 1,
                    None => return Err(ParseError::VariationWithoutMove { offset }),
                };
                stack.push(Frame::variation(start_ply, offset));
            }
            Token::Close => {
                if stack.len() == 1 {
                    return Err(ParseError::UnbalancedParen { offset });
                }
                let Some(frame) = stack.pop() else {
                    return Err(ParseError::UnbalancedParen { offset });
                };
                let Some(first) = frame.moves.first() else {
                    continue;
                };
                let variation = ParsedVariation {
                    origin_ply: first.ply,
                    moves: frame.moves,
                };
                let depth = stack.len();
                match stack.last_mut().and_then(|parent| parent.moves.last_mut()) {
                    Some(parent_move) => parent_move.variations.push(variation),
                    None if depth == 1 => game.root_variations.push(variation),
                    None => return Err(ParseError::VariationWithoutMove { offset: frame.offset }),
                }
            }
            Token::Result(outcome) => {
                if stack.len() > 1 {
                    return Err(ParseError::UnexpectedToken {
                        token: outcome.token().to_string(),
                        offset,
                    });
                }
                game.result = Some(outcome);
                break;
            }
        }
    }

    if stack.len() > 1 {
        let offset = stack.last().map_or(0, |frame| frame.offset);
        return Err(ParseError::UnbalancedParen { offset });
    }
    if let Some(frame) = stack.pop() {
        game.mainline = frame.moves;
    }
    Ok(game)
}

/// Moves collected for the main line or one open variation
struct Frame {
    moves: Vec<ParsedMove>,
    /// Ply of the first move when nothing is declared
    start_ply: u32,
    /// Ply named by the most recent move number
    declared: Option<u32>,
    is_variation: bool,
    offset: usize,
}

impl Frame {
    fn mainline() -> Self {
        Self {
            moves: Vec::new(),
            start_ply: 1,
            declared: None,
            is_variation: false,
            offset: 0,
        }
    }

    fn variation(start_ply: u32, offset: usize) -> Self {
        Self {
            moves: Vec::new(),
            start_ply,
            declared: None,
            is_variation: true,
            offset,
        }
    }

    fn push(&mut self, san: String, offset: usize) -> ParseResult<()> {
        let ply = match self.moves.last() {
            Some(previous) => previous.ply.checked_add(1),
            None if self.is_variation => Some(self.declared.unwrap_or(self.start_ply)),
            None => Some(self.start_ply),
        };
        let Some(ply) = ply else {
            return Err(ParseError::UnexpectedToken { token: san, offset });
        };
        self.declared = None;
        self.moves.push(ParsedMove {
            san,
            ply,
            variations: Vec::new(),
        });
        Ok(())
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Tag(Tag),
    MoveNumber { number: u32, color: PieceColor },
    San(String),
    Open,
    Close,
    Result(GameOutcome),
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn tokenize(mut self) -> ParseResult<Vec<(usize, Token)>> {
        let mut tokens = Vec::new();
        let mut line_start = true;

        while let Some(c) = self.peek() {
            let offset = self.pos;
            match c {
                '\n' => {
                    self.bump();
                    line_start = true;
                    continue;
                }
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '%' if line_start => self.skip_line(),
                ';' => self.skip_line(),
                '{' => self.skip_comment(offset)?,
                '[' => {
                    let tag = self.tag(offset)?;
                    tokens.push((offset, Token::Tag(tag)));
                }
                '(' => {
                    self.bump();
                    tokens.push((offset, Token::Open));
                }
                ')' => {
                    self.bump();
                    tokens.push((offset, Token::Close));
                }
                '$' => {
                    self.bump();
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                }
                ']' | '}' => {
                    return Err(ParseError::UnexpectedToken {
                        token: c.to_string(),
                        offset,
                    });
                }
                _ => {
                    let word = self.word();
                    classify_word(word, offset, &mut tokens)?;
                }
            }
            line_start = false;
        }

        Ok(tokens)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_comment(&mut self, offset: usize) -> ParseResult<()> {
        while let Some(c) = self.bump() {
            if c == '}' {
                return Ok(());
            }
        }
        Err(ParseError::UnterminatedComment { offset })
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || "(){}[];$".contains(c) {
                break;
            }
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// `[Name "Value"]` with `\"` and `\\` escapes in the value
    fn tag(&mut self, offset: usize) -> ParseResult<Tag> {
        self.bump();
        let start = self.pos;
        let mut in_quotes = false;
        let mut escaped = false;
        let end = loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::UnterminatedTag { offset });
            };
            match c {
                _ if escaped => escaped = false,
                '\\' if in_quotes => escaped = true,
                '"' => in_quotes = !in_quotes,
                ']' if !in_quotes => break self.pos - 1,
                '\n' if in_quotes => return Err(ParseError::UnterminatedTag { offset }),
                _ => {}
            }
        };
        let body = &self.text[start..end];
        parse_tag_body(body).ok_or_else(|| ParseError::MalformedTag {
            offset,
            text: body.to_string(),
        })
    }
}

fn parse_tag_body(body: &str) -> Option<Tag> {
    let body = body.trim();
    let name_end = body.find(|c: char| !(c.is_alphanumeric() || c == '_'))?;
    let (name, rest) = body.split_at(name_end);
    if name.is_empty() {
        return None;
    }

    let quoted = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?),
            '"' => return None,
            other => value.push(other),
        }
    }
    Some(Tag::new(name, value))
}

fn classify_word(word: &str, offset: usize, tokens: &mut Vec<(usize, Token)>) -> ParseResult<()> {
    if let Some(outcome) = GameOutcome::from_token(word) {
        tokens.push((offset, Token::Result(outcome)));
        return Ok(());
    }

    // Castling written with zeros would otherwise read as a move number
    if matches!(word.trim_end_matches(['+', '#', '!', '?']), "0-0" | "0-0-0") {
        tokens.push((offset, Token::San(word.to_string())));
        return Ok(());
    }

    if word.starts_with(|c: char| c.is_ascii_digit()) {
        let digits_end = word
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(word.len());
        let number: u32 = word[..digits_end]
            .parse()
            .map_err(|_| ParseError::UnexpectedToken {
                token: word.to_string(),
                offset,
            })?;
        // The Black ply is the larger of the two, so this covers both colors
        if ply_for(number, PieceColor::Black).is_none() {
            return Err(ParseError::UnexpectedToken {
                token: word.to_string(),
                offset,
            });
        }
        let rest = &word[digits_end..];
        let san = rest.trim_start_matches('.');
        let dots = rest.len() - san.len();
        let color = if dots >= 3 {
            PieceColor::Black
        } else {
            PieceColor::White
        };
        tokens.push((offset, Token::MoveNumber { number, color }));
        if !san.is_empty() {
            return classify_word(san, offset + digits_end + dots, tokens);
        }
        return Ok(());
    }

    // "1. ... e5" marks the following move as Black's
    if word.chars().all(|c| c == '.') {
        if let Some((_, Token::MoveNumber { color, .. })) = tokens.last_mut() {
            if word.len() >= 2 {
                *color = PieceColor::Black;
            }
        }
        return Ok(());
    }

    // Null moves have no SAN the replayer could resolve
    if matches!(word, "--" | "Z0") {
        return Err(ParseError::UnexpectedToken {
            token: word.to_string(),
            offset,
        });
    }

    if is_glyph(word) {
        return Ok(());
    }

    tokens.push((offset, Token::San(word.to_string())));
    Ok(())
}

/// Free-standing evaluation symbols such as `!?`, `+-` or `=`
fn is_glyph(word: &str) -> bool {
    word.chars().all(|c| {
        matches!(
            c,
            '!' | '?' | '+' | '-' | '=' | '/' | '~' | '±' | '∓' | '∞' | '□' | '⩲' | '⩱'
        )
    })
}
