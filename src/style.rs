//! Inline `style` attribute filtering.
//!
//! Parses a declaration block leniently (malformed declarations are skipped,
//! not fatal) and keeps only properties on the policy allowlist. Values are
//! kept as raw source text; the sanitizer does not interpret them.

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::policy::Policy;

/// A `(property, value)` pair from a declaration block. Property names are
/// lower-cased, values are trimmed source text.
pub(crate) type Declaration = (String, String);

/// Parse a `style` attribute value into declarations.
pub(crate) fn parse_declarations(css: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();
    parse_declaration_block(&mut parser, &mut declarations);
    declarations
}

/// Parse a declaration block (property: value; ...) into `out`.
fn parse_declaration_block<'i>(input: &mut Parser<'i, '_>, out: &mut Vec<Declaration>) {
    loop {
        input.skip_whitespace();

        if input.is_exhausted() {
            break;
        }

        // Try to parse a declaration
        let result: Result<(), ParseError<'i, ()>> = input.try_parse(|i| {
            let property = match i.next()? {
                Token::Ident(name) => name.to_string().to_lowercase(),
                _ => return Err(i.new_custom_error(())),
            };

            i.skip_whitespace();

            match i.next()? {
                Token::Colon => {}
                _ => return Err(i.new_custom_error(())),
            }

            i.skip_whitespace();

            // Slice the raw value text up to the semicolon (or end of input)
            let start = i.position();
            let mut end = start;
            loop {
                match i.next() {
                    Ok(Token::Semicolon) => break,
                    Ok(token) => {
                        if token.is_parse_error() {
                            // Unbalanced close token, give up on this declaration
                            return Err(i.new_custom_error(()));
                        }
                        let has_block = matches!(
                            token,
                            Token::Function(_)
                                | Token::ParenthesisBlock
                                | Token::SquareBracketBlock
                                | Token::CurlyBracketBlock
                        );
                        if has_block {
                            // Consume the nested block so the slice covers it
                            i.parse_nested_block(|block| {
                                while block.next().is_ok() {}
                                Ok(())
                            })?;
                        }
                        end = i.position();
                    }
                    Err(_) => break,
                }
            }

            let value = strip_important(i.slice(start..end).trim());
            if !value.is_empty() {
                out.push((property, value.to_string()));
            }
            Ok(())
        });

        if result.is_err() {
            // Skip to next semicolon to recover
            loop {
                match input.next() {
                    Ok(Token::Semicolon) => break,
                    Ok(_) => continue,
                    Err(_) => break,
                }
            }
        }
    }
}

/// Drop a trailing `!important`; priority is meaningless on editor content.
fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    if let Some(rest) = lower.strip_suffix("important") {
        if let Some(rest) = rest.trim_end().strip_suffix('!') {
            return value[..rest.trim_end().len()].trim_end();
        }
    }
    value
}

/// Filter a `style` attribute value against the policy.
///
/// Surviving properties are re-emitted as `"prop: value; prop2: value2"` in
/// policy enumeration order; when the same property appears more than once
/// the last occurrence wins. Returns `None` when nothing survives, so the
/// caller drops the attribute instead of leaving it empty.
pub(crate) fn filter_style(value: &str, policy: &Policy) -> Option<String> {
    let declarations = parse_declarations(value);

    let mut kept = Vec::new();
    for property in policy.style_properties() {
        if let Some((_, value)) = declarations.iter().rev().find(|(p, _)| p == property) {
            kept.push(format!("{property}: {value}"));
        }
    }

    if kept.is_empty() { None } else { Some(kept.join("; ")) }
}
