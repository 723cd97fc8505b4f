use crate::ast::{ArgumentGroup, FunctionPrototype, Location, Token, TokenKind};
use crate::error::{Error, Result};
use crate::tokenizer::tokenize;

enum ParseState<'a> {
    /// Collecting return type tokens and the name, waiting for `(`
    FunctionStart { left: Vec<Token<'a>> },
    /// Inside the argument list of `prototype`
    FunctionArgs {
        prototype: FunctionPrototype,
        names: Vec<String>,
        opened: Location,
    },
}

/// Tokenize and parse prototype source in one go
pub fn parse_source(source: &str) -> Result<Vec<FunctionPrototype>> {
    let tokens = tokenize(source)?;
    parse_prototypes(&tokens)
}

/// Group a token stream into function prototypes.
///
/// Prototypes may follow each other without any terminator; whatever sits
/// between the `)` of one prototype and the name of the next becomes part of
/// the next return type. Tokens left over after the last `)` are ignored,
/// but input that ends inside an argument list fails with
/// [`Error::UnterminatedArguments`] instead of yielding a partial prototype.
pub fn parse_prototypes(tokens: &[Token<'_>]) -> Result<Vec<FunctionPrototype>> {
    let mut prototypes = Vec::new();
    let mut state = ParseState::FunctionStart { left: Vec::new() };
    let mut tokens = tokens.iter().peekable();

    while let Some(token) = tokens.next() {
        state = match state {
            ParseState::FunctionStart { mut left } => {
                if token.kind == TokenKind::BraceBegin {
                    let prototype = start_prototype(left, token)?;
                    log::trace!("entering argument list of '{}'", prototype.name);
                    ParseState::FunctionArgs {
                        prototype,
                        names: Vec::new(),
                        opened: token.location,
                    }
                } else {
                    left.push(*token);
                    ParseState::FunctionStart { left }
                }
            }
            ParseState::FunctionArgs {
                mut prototype,
                mut names,
                opened,
            } => match token.kind {
                TokenKind::ArgSeparator => {
                    prototype
                        .args
                        .push(ArgumentGroup::new(std::mem::take(&mut names)));
                    match tokens.peek() {
                        None => {
                            return Err(Error::DanglingSeparator {
                                location: token.location,
                            });
                        }
                        Some(next) if !next.is_ident() => {
                            return Err(Error::ExpectedIdent {
                                found: next.value().to_string(),
                                location: next.location,
                            });
                        }
                        Some(_) => {}
                    }
                    ParseState::FunctionArgs {
                        prototype,
                        names,
                        opened,
                    }
                }
                TokenKind::BraceEnd => {
                    prototype.args.push(ArgumentGroup::new(names));
                    log::trace!(
                        "finished '{}' with {} argument groups",
                        prototype.name,
                        prototype.args.len()
                    );
                    prototypes.push(prototype);
                    ParseState::FunctionStart { left: Vec::new() }
                }
                _ => {
                    names.push(token.value().to_string());
                    ParseState::FunctionArgs {
                        prototype,
                        names,
                        opened,
                    }
                }
            },
        };
    }

    match state {
        ParseState::FunctionStart { left } => {
            if !left.is_empty() {
                log::warn!("ignoring {} trailing tokens after the last prototype", left.len());
            }
        }
        ParseState::FunctionArgs {
            prototype, opened, ..
        } => {
            return Err(Error::UnterminatedArguments {
                name: prototype.name,
                location: opened,
            });
        }
    }

    log::debug!("parsed {} prototypes", prototypes.len());
    Ok(prototypes)
}

/// Split the tokens seen before `(` into the function name and return type
fn start_prototype(mut left: Vec<Token<'_>>, brace: &Token<'_>) -> Result<FunctionPrototype> {
    let name = left.pop().ok_or_else(|| Error::MissingName {
        token: brace.value().to_string(),
        location: brace.location,
    })?;
    if !name.is_ident() {
        return Err(Error::ExpectedIdent {
            found: name.value().to_string(),
            location: name.location,
        });
    }

    let returns = left.iter().map(|t| t.value().to_string()).collect();
    Ok(FunctionPrototype::new(name.value(), returns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(names: &[&str]) -> ArgumentGroup {
        ArgumentGroup::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_parse_simple_prototype() {
        let prototypes = parse_source("int add(int a, int b)").unwrap();
        assert_eq!(prototypes.len(), 1);

        let add = &prototypes[0];
        assert_eq!(add.name, "add");
        assert_eq!(add.returns, vec!["int"]);
        assert_eq!(add.args, vec![group(&["int", "a"]), group(&["int", "b"])]);
    }

    #[test]
    fn test_parse_pointer_tokens_are_kept() {
        let prototypes = parse_source("const char **names(void *p)").unwrap();
        let names = &prototypes[0];
        assert_eq!(names.name, "names");
        assert_eq!(names.returns, vec!["const", "char", "*", "*"]);
        assert_eq!(names.args, vec![group(&["void", "*", "p"])]);
    }

    #[test]
    fn test_parse_back_to_back_prototypes() {
        let prototypes = parse_source("void a(int x)\nint b(float y, float z)").unwrap();
        let names: Vec<&str> = prototypes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(prototypes[1].returns, vec!["int"]);
        assert_eq!(prototypes[1].args.len(), 2);
    }

    #[test]
    fn test_parse_tokens_between_prototypes_join_return_type() {
        let prototypes = parse_source("void a(int x); int b(int y)").unwrap();
        assert_eq!(prototypes[1].returns, vec![";", "int"]);
    }

    #[test]
    fn test_parse_empty_argument_list() {
        let prototypes = parse_source("void f()").unwrap();
        assert_eq!(prototypes[0].args, vec![ArgumentGroup::default()]);
    }

    #[test]
    fn test_parse_without_return_type() {
        let prototypes = parse_source("add(int a, int b)").unwrap();
        assert!(prototypes[0].returns.is_empty());
        assert_eq!(prototypes[0].name, "add");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_source("").unwrap().is_empty());
        assert!(parse_source("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_trailing_tokens_are_ignored() {
        let prototypes = parse_source("int f(int a);").unwrap();
        assert_eq!(prototypes.len(), 1);
    }

    #[test]
    fn test_error_missing_name() {
        let err = parse_source("(int a)").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingName { ref token, location } if token == "(" && location == Location::new(1, 1)
        ));
    }

    #[test]
    fn test_error_name_not_identifier() {
        let err = parse_source("int *(int a)").unwrap_err();
        assert!(matches!(
            err,
            Error::ExpectedIdent { ref found, location } if found == "*" && location == Location::new(1, 5)
        ));
    }

    #[test]
    fn test_error_separator_before_close() {
        let err = parse_source("foo(a,)").unwrap_err();
        assert!(matches!(
            err,
            Error::ExpectedIdent { ref found, location } if found == ")" && location == Location::new(1, 7)
        ));
    }

    #[test]
    fn test_error_separator_followed_by_symbol() {
        let err = parse_source("foo(int a, *b)").unwrap_err();
        assert!(matches!(err, Error::ExpectedIdent { ref found, .. } if found == "*"));
    }

    #[test]
    fn test_error_separator_at_end_of_input() {
        let err = parse_source("foo(int a,").unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingSeparator { location } if location == Location::new(1, 10)
        ));
    }

    #[test]
    fn test_error_unterminated_arguments() {
        let err = parse_source("int f(int a").unwrap_err();
        assert!(matches!(
            err,
            Error::UnterminatedArguments { ref name, location } if name == "f" && location == Location::new(1, 6)
        ));
    }

    #[test]
    fn test_error_messages_carry_position() {
        let err = parse_source("void a()\n  (x)").unwrap_err();
        assert_eq!(err.to_string(), "No tokens before '(' at 2:3");
        assert_eq!(err.location(), Some(Location::new(2, 3)));
    }
}
