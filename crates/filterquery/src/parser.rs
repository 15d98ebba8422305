//! The FilterQuery recursive-descent parser (C6).
//!
//! Grammar (terminals in quotes, `STRING`/`QSTRING`/`INTEGER`/`FLOAT` are
//! lexer tokens):
//!
//! ```text
//! Input          := { FieldPair | Group } [";"]
//! Group          := ["*"] "(" { FieldPair | Group } [";"] ")" [";"]
//! FieldPair      := IDENTIFIER ":" Values [";"]
//! Values         := Value { "," Value }
//! Value          := ["!"] (SimpleValue | Range) | Comparison | PatternMatch
//! SimpleValue    := STRING | QSTRING | INTEGER | FLOAT
//! Range          := [ "[" | "]" ] SimpleValue "-" SimpleValue [ "[" | "]" ]
//! Comparison     := ("<" ["="] | "<>" | ">" ["="]) SimpleValue
//! PatternMatch   := "~" ["i"] ["!"] ("*"|">"|"<"|"?") SimpleValue
//! ```
//!
//! A group prefixed with `*` sets `logical = OR`; otherwise `AND`. Field
//! pairs and subgroups interleave freely at any nesting level. If a field
//! name appears twice in the same containing group, the parser merges the
//! new values into the existing bag rather than overwriting it.

use condition_core::{
    Comparison, ComparisonOperator, Condition, ConditionError, FieldConfig, FieldSet, Limits,
    Logical, PatternKind, PatternMatch, Range, ValueKind, ValuesBag, ValuesGroup,
};

use crate::lexer::{tokenize, Token, TokenStream};

/// Parses `input` as a FilterQuery document against `field_set`, enforcing
/// `limits`. Empty or whitespace-only input returns `Ok(None)` — "no
/// condition" rather than an empty one.
pub fn parse<'a, FS: FieldSet>(
    input: &str,
    field_set: &'a FS,
    limits: &Limits,
) -> Result<Option<Condition<'a, FS>>, ConditionError> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let tokens = tokenize(input)?;
    let stream = TokenStream::new(tokens, input.len());
    let mut parser = Parser {
        stream,
        field_set,
        limits,
    };
    let root = parser.parse_group(0, 0)?;
    if !parser.stream.is_at_end() {
        return Err(parser.error("end of input"));
    }
    Ok(Some(Condition::new(field_set, root)))
}

struct Parser<'fs, 'lim, FS: FieldSet> {
    stream: TokenStream,
    field_set: &'fs FS,
    limits: &'lim Limits,
}

impl<'fs, 'lim, FS: FieldSet> Parser<'fs, 'lim, FS> {
    fn error(&self, expected: &str) -> ConditionError {
        let got = self
            .stream
            .peek()
            .map(Token::label)
            .unwrap_or_else(|| "end of input".to_string());
        ConditionError::Syntax {
            position: self.stream.position(),
            expected: expected.to_string(),
            got,
        }
    }

    /// Parses the contents of one group level: an interleaved sequence of
    /// field pairs and subgroups, followed by an optional trailing `;`.
    fn parse_group(&mut self, group_idx: usize, level: usize) -> Result<ValuesGroup, ConditionError> {
        if level > self.limits.max_depth() {
            tracing::warn!(group_idx, level, max = self.limits.max_depth(), "group nesting limit exceeded");
            return Err(ConditionError::GroupsNesting {
                max: self.limits.max_depth(),
                group_idx,
                level,
            });
        }
        tracing::trace!(group_idx, level, "opening group");

        let mut group = ValuesGroup::new(Logical::And);
        let mut subgroup_count = 0usize;

        loop {
            match self.stream.peek() {
                Some(Token::Ident(_)) => {
                    self.parse_field_pair(&mut group, group_idx, level)?;
                }
                Some(Token::LParen) => {
                    let child = self.parse_bracketed_group(false, subgroup_count, level)?;
                    subgroup_count += 1;
                    if subgroup_count > self.limits.max_groups() {
                        return Err(ConditionError::GroupsOverflow {
                            max: self.limits.max_groups(),
                            current: subgroup_count,
                            group_idx,
                            level,
                        });
                    }
                    group.add_group(child);
                }
                Some(Token::Star) if matches!(self.stream.glimpse(1), Some(Token::LParen)) => {
                    self.stream.advance();
                    let child = self.parse_bracketed_group(true, subgroup_count, level)?;
                    subgroup_count += 1;
                    if subgroup_count > self.limits.max_groups() {
                        return Err(ConditionError::GroupsOverflow {
                            max: self.limits.max_groups(),
                            current: subgroup_count,
                            group_idx,
                            level,
                        });
                    }
                    group.add_group(child);
                }
                _ => break,
            }
        }

        if matches!(self.stream.peek(), Some(Token::Semicolon)) {
            self.stream.advance();
        }

        self.check_required_fields(&group, group_idx, level)?;

        Ok(group)
    }

    /// Parses `["*"] "(" Group ")" [";"]`, with the leading `*` (if any)
    /// already consumed by the caller; `is_or` records that fact.
    fn parse_bracketed_group(
        &mut self,
        is_or: bool,
        group_idx: usize,
        level: usize,
    ) -> Result<ValuesGroup, ConditionError> {
        self.expect(&Token::LParen, "'('")?;
        let mut inner = self.parse_group(group_idx, level + 1)?;
        self.expect(&Token::RParen, "')'")?;
        if matches!(self.stream.peek(), Some(Token::Semicolon)) {
            self.stream.advance();
        }
        inner.set_logical(if is_or { Logical::Or } else { Logical::And });
        Ok(inner)
    }

    fn check_required_fields(
        &self,
        group: &ValuesGroup,
        group_idx: usize,
        level: usize,
    ) -> Result<(), ConditionError> {
        if group.field_count() == 0 && group.group_count() == 0 {
            return Ok(());
        }
        for (name, field) in self.field_set.all() {
            if field.is_required() && !group.has_field(name) {
                return Err(ConditionError::FieldRequired {
                    field_name: name.to_string(),
                    group_idx,
                    level,
                });
            }
        }
        Ok(())
    }

    fn expect(&mut self, want: &Token, label: &str) -> Result<(), ConditionError> {
        if self.stream.peek() == Some(want) {
            self.stream.advance();
            Ok(())
        } else {
            Err(self.error(label))
        }
    }

    /// A field name repeated within the same group merges into the
    /// existing bag instead of overwriting it.
    fn parse_field_pair(
        &mut self,
        group: &mut ValuesGroup,
        group_idx: usize,
        level: usize,
    ) -> Result<(), ConditionError> {
        let name = match self.stream.advance() {
            Some(Token::Ident(s)) => s.clone(),
            _ => return Err(self.error("a field identifier")),
        };
        if !self.field_set.has(&name) {
            return Err(ConditionError::UnknownField { field_name: name });
        }
        // Safe: `has` just returned true for this exact name.
        let field = self.field_set.get(&name).expect("field just checked present");

        if !group.has_field(&name) {
            group.add_field(name.clone(), ValuesBag::new());
        }
        let bag = group
            .get_field_mut(&name)
            .expect("field just inserted or already present");
        self.parse_values(bag, field, &name, group_idx, level)?;

        if matches!(self.stream.peek(), Some(Token::Semicolon)) {
            self.stream.advance();
        }

        Ok(())
    }

    fn parse_values(
        &mut self,
        bag: &mut ValuesBag,
        field: &FS::Field,
        field_name: &str,
        group_idx: usize,
        level: usize,
    ) -> Result<(), ConditionError> {
        loop {
            self.parse_value(bag, field, field_name)?;
            if bag.count() > self.limits.max_values() {
                tracing::warn!(field_name, max = self.limits.max_values(), current = bag.count(), "values limit exceeded");
                return Err(ConditionError::ValuesOverflow {
                    field_name: field_name.to_string(),
                    max: self.limits.max_values(),
                    current: bag.count(),
                    group_idx,
                    level,
                });
            }
            if matches!(self.stream.peek(), Some(Token::Comma)) {
                self.stream.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn parse_value(
        &mut self,
        bag: &mut ValuesBag,
        field: &FS::Field,
        field_name: &str,
    ) -> Result<(), ConditionError> {
        match self.stream.peek() {
            Some(Token::Tilde) => self.parse_pattern_match(bag, field, field_name),
            Some(Token::Lt) | Some(Token::Gt) => self.parse_comparison(bag, field, field_name),
            Some(Token::Bang) => {
                self.stream.advance();
                self.parse_single_or_range(bag, field, field_name, true)
            }
            Some(_) => self.parse_single_or_range(bag, field, field_name, false),
            None => Err(self.error("a value")),
        }
    }

    fn take_bracket(&mut self) -> Option<Token> {
        let is_bracket = matches!(
            self.stream.peek(),
            Some(Token::LBracket) | Some(Token::RBracket)
        );
        if is_bracket {
            let tok = self.stream.peek().cloned();
            self.stream.advance();
            tok
        } else {
            None
        }
    }

    fn parse_single_or_range(
        &mut self,
        bag: &mut ValuesBag,
        field: &FS::Field,
        field_name: &str,
        excluded: bool,
    ) -> Result<(), ConditionError> {
        let lower_bracket = self.take_bracket();
        let first = self.parse_simple_value()?;

        if matches!(self.stream.peek(), Some(Token::Minus)) {
            self.stream.advance();
            let second = self.parse_simple_value()?;
            let upper_bracket = self.take_bracket();

            if !field.accept_ranges() {
                return Err(ConditionError::UnsupportedValueType {
                    field_name: field_name.to_string(),
                    value_type: ValueKind::Range,
                });
            }

            // "[" before the lower bound (or no bracket) keeps it inclusive;
            // "]" before the lower bound excludes it. Symmetrically, "]"
            // after the upper bound (or no bracket) keeps it inclusive, "["
            // excludes it.
            let lower_inclusive = lower_bracket != Some(Token::RBracket);
            let upper_inclusive = upper_bracket != Some(Token::LBracket);
            let range = Range::new(first, second)
                .with_lower_inclusive(lower_inclusive)
                .with_upper_inclusive(upper_inclusive);

            if excluded {
                bag.add_excluded_range(range);
            } else {
                bag.add_range(range);
            }
        } else {
            if lower_bracket.is_some() {
                return Err(self.error("'-' to complete a range"));
            }
            if excluded {
                bag.add_excluded_single(first);
            } else {
                bag.add_single(first);
            }
        }
        Ok(())
    }

    fn parse_comparison(
        &mut self,
        bag: &mut ValuesBag,
        field: &FS::Field,
        field_name: &str,
    ) -> Result<(), ConditionError> {
        let operator = match self.stream.advance() {
            Some(Token::Lt) => {
                if matches!(self.stream.peek(), Some(Token::Equals)) {
                    self.stream.advance();
                    ComparisonOperator::LessThanOrEqual
                } else if matches!(self.stream.peek(), Some(Token::Gt)) {
                    self.stream.advance();
                    ComparisonOperator::NotEqual
                } else {
                    ComparisonOperator::LessThan
                }
            }
            Some(Token::Gt) => {
                if matches!(self.stream.peek(), Some(Token::Equals)) {
                    self.stream.advance();
                    ComparisonOperator::GreaterThanOrEqual
                } else {
                    ComparisonOperator::GreaterThan
                }
            }
            _ => return Err(self.error("a comparison operator")),
        };

        let operand = self.parse_simple_value()?;

        if !field.accept_compares() {
            return Err(ConditionError::UnsupportedValueType {
                field_name: field_name.to_string(),
                value_type: ValueKind::Comparison,
            });
        }
        bag.add_comparison(Comparison::new(operator, operand));
        Ok(())
    }

    fn parse_pattern_match(
        &mut self,
        bag: &mut ValuesBag,
        field: &FS::Field,
        field_name: &str,
    ) -> Result<(), ConditionError> {
        self.stream.advance(); // '~'

        let mut case_insensitive = false;
        if let Some(Token::Bareword(w)) = self.stream.peek() {
            if w.eq_ignore_ascii_case("i") {
                case_insensitive = true;
                self.stream.advance();
            }
        }

        let exclusive = if matches!(self.stream.peek(), Some(Token::Bang)) {
            self.stream.advance();
            true
        } else {
            false
        };

        let symbol = match self.stream.advance() {
            Some(Token::Star) => '*',
            Some(Token::Gt) => '>',
            Some(Token::Lt) => '<',
            Some(Token::Question) => '?',
            _ => return Err(self.error("a pattern-match symbol ('*', '>', '<', '?')")),
        };
        let kind =
            PatternKind::from_symbol(symbol, exclusive).expect("symbol matched above is valid");

        let pattern = self.parse_simple_value()?;

        if !field.accept_pattern_match() {
            return Err(ConditionError::UnsupportedValueType {
                field_name: field_name.to_string(),
                value_type: ValueKind::PatternMatch,
            });
        }
        bag.add_pattern_match(PatternMatch::new(kind, pattern, case_insensitive));
        Ok(())
    }

    fn parse_simple_value(&mut self) -> Result<String, ConditionError> {
        match self.stream.advance() {
            Some(Token::Bareword(s)) => Ok(s.clone()),
            Some(Token::QuotedString(s)) => Ok(s.clone()),
            Some(Token::Integer(s)) => Ok(s.clone()),
            Some(Token::Float(s)) => Ok(s.clone()),
            _ => Err(self.error("a value")),
        }
    }
}
