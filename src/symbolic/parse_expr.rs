//! a module turns a String expression into a symbolic expression
//!# Example
//! ```
//! use RustedMathSolver::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("x^2 + 2*x").unwrap();
//! assert_eq!(parsed_expression.to_string(), "x**2 + 2*x");
//! ```
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::brackets_balanced;
use log::debug;

/// longest accepted input, in tokens
const MAX_TOKENS: usize = 1000;
/// deepest accepted bracket nesting
const MAX_NESTING: usize = 100;
//                  precedence ladder
//                |  lowest   |  + -                 |
//                |___________|______________________|
//                |           |  * /                 |
//                |___________|______________________|
//                |           |  unary -             |
//                |___________|______________________|
//                |           |  ^ or ** (right)     |
//                |___________|______________________|
//                |  highest  |  number, name, f(..) |
//                |           |  ( ... )             |

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::Num(val) => write!(f, "{}", val),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "**"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        if tokens.len() > MAX_TOKENS {
            return Err(format!("expression is too long, the limit is {} tokens", MAX_TOKENS));
        }
        let c = chars[i];
        match c {
            _ if c.is_whitespace() => {
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // scientific notation: 1e3, 2.5e-4
                if i + 1 < chars.len() && chars[i] == 'e' {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{}'", literal))?;
                if i < chars.len() && (chars[i].is_alphabetic() || chars[i] == '_' || chars[i] == '(') {
                    let fragment: String = chars[start..=i].iter().collect();
                    return Err(format!(
                        "implicit multiplication is not supported in '{}', write '*' between factors",
                        fragment
                    ));
                }
                tokens.push(Token::Num(value));
            }
            _ if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(format!("brackets are nested deeper than {}", MAX_NESTING));
                }
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => return Err(format!("unexpected character '{}' at position {}", c, i)),
        }
    }
    if tokens.len() > MAX_TOKENS {
        return Err(format!("expression is too long, the limit is {} tokens", MAX_TOKENS));
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected '{}' but found '{}'", expected, token)),
            None => Err(format!("expected '{}' but the expression ended", expected)),
        }
    }

    // expr := term (('+'|'-') term)*
    fn parse_sum(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_product()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    lhs = Expr::Add(Box::new(lhs), Box::new(rhs));
                }
                Token::Minus => {
                    self.pos += 1;
                    let rhs = self.parse_product()?;
                    lhs = Expr::Sub(Box::new(lhs), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    // term := unary (('*'|'/') unary)*
    fn parse_product(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_unary()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    lhs = Expr::Mul(Box::new(lhs), Box::new(rhs));
                }
                Token::Slash => {
                    self.pos += 1;
                    let rhs = self.parse_unary()?;
                    lhs = Expr::Div(Box::new(lhs), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    // unary := ('-'|'+') unary | power
    fn parse_unary(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let inner = self.parse_unary()?;
                Ok(match inner {
                    Expr::Const(val) => Expr::Const(-val),
                    other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
                })
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power := atom (('^'|'**') unary)?
    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr, String> {
        match self.next() {
            Some(Token::Num(val)) => Ok(Expr::Const(val)),
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.pos += 1;
                    let arg = self.parse_sum()?;
                    self.expect(Token::RParen)?;
                    return apply_function(&name, arg);
                }
                Ok(Expr::Var(name))
            }
            Some(Token::LParen) => {
                let inner = self.parse_sum()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(token) => Err(format!("unexpected '{}'", token)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

fn apply_function(name: &str, arg: Expr) -> Result<Expr, String> {
    let arg = Box::new(arg);
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "log" | "ln" => Expr::Ln(arg),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "acot" | "arccot" | "arcctg" => Expr::arcctg(arg),
        "sqrt" => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        _ => return Err(format!("unknown function '{}'", name)),
    };
    Ok(expr)
}

/// Parses a string into a symbolic expression.
///
/// Accepts `+ - * /`, powers written as `^` or `**`, unary minus, brackets,
/// decimal and scientific numbers, variable names and the functions exp, log/ln,
/// sqrt, sin, cos, tan/tg, cot/ctg and their inverses. There is no implicit
/// multiplication: `2x` is an error, `2*x` is not. `pi` stays a symbol and is
/// only turned into a number on evaluation.
///
/// Input longer than 1000 tokens or nested deeper than 100 brackets is rejected.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty expression".to_string());
    }
    if !brackets_balanced(input) {
        return Err(format!("unbalanced brackets in '{}'", input));
    }
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_sum()?;
    if let Some(token) = parser.peek() {
        return Err(format!("unexpected '{}' in '{}'", token, input));
    }
    debug!("parsed '{}' into {:?}", input, expr);
    Ok(expr)
}

impl Expr {
    /// parse expression from string to symbolic expression
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_parse_exponential() {
        let expr = parse_expression_func("exp(x)").unwrap();
        assert_eq!(expr, Expr::Exp(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
        let expr = parse_expression_func("2.5e-1").unwrap();
        assert_eq!(expr, Expr::Const(0.25));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
        let expr = parse_expression_func("of2x").unwrap();
        assert_eq!(expr, Expr::Var("of2x".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_expression_func("x + 2").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_subtraction_is_left_associative() {
        let result = parse_expression_func("x^2 - x - 1").unwrap();
        let x = Box::new(Expr::Var("x".to_string()));
        let to_check = Expr::Pow(x.clone(), Box::new(Expr::Const(2.0))) - *x - Expr::Const(1.0);
        assert_eq!(result, to_check);
    }

    #[test]
    fn test_parse_division() {
        let expr = parse_expression_func("x / 2").unwrap();
        assert_eq!(
            expr,
            Expr::Div(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_power_both_spellings() {
        let expected = Expr::Pow(
            Box::new(Expr::Var("x".to_string())),
            Box::new(Expr::Const(2.0)),
        );
        assert_eq!(parse_expression_func("x^2").unwrap(), expected);
        assert_eq!(parse_expression_func("x**2").unwrap(), expected);
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        let expr = parse_expression_func("2^3^2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Const(3.0)),
                    Box::new(Expr::Const(2.0))
                ))
            )
        );
    }

    #[test]
    fn test_parse_unary_minus() {
        let expr = parse_expression_func("-x^2").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Const(2.0))
                ))
            )
        );
        let expr = parse_expression_func("x^-1").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(-1.0))
            )
        );
    }

    #[test]
    fn test_parse_logarithm_and_sqrt() {
        let expr = parse_expression_func("log(x)").unwrap();
        assert_eq!(expr, Expr::Ln(Box::new(Expr::Var("x".to_string()))));
        let expr = parse_expression_func("ln(x)").unwrap();
        assert_eq!(expr, Expr::Ln(Box::new(Expr::Var("x".to_string()))));
        let expr = parse_expression_func("sqrt(x)").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()).sqrt());
    }

    #[test]
    fn test_parse_with_brackets() {
        let expr = parse_expression_func("(x + y) * z").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                )),
                Box::new(Expr::Var("z".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_nested_trig() {
        let expr = parse_expression_func("sin(cos(x))").unwrap();
        assert_eq!(
            expr,
            Expr::sin(Box::new(Expr::cos(Box::new(Expr::Var("x".to_string())))))
        );
        let expr = parse_expression_func("tan(x) + arctg(x)").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::tg(Box::new(Expr::Var("x".to_string())))),
                Box::new(Expr::arctg(Box::new(Expr::Var("x".to_string()))))
            )
        );
    }

    #[test]
    fn test_parse_pi() {
        let expr = parse_expression_func("2*pi").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(Expr::Var("pi".to_string())))
        );
    }

    #[test]
    fn test_size_limits() {
        let long = "x+".repeat(200_000) + "x";
        let err = parse_expression_func(&long).unwrap_err();
        assert!(err.contains("too long"), "{}", err);
        let deep = "(".repeat(5_000) + "x" + &")".repeat(5_000);
        let err = parse_expression_func(&deep).unwrap_err();
        assert!(err.contains("nested"), "{}", err);
        // right at the limits is still fine
        let at_limit = "x+".repeat(499) + "x";
        assert!(parse_expression_func(&at_limit).is_ok());
        let nested = "(".repeat(100) + "x" + &")".repeat(100);
        assert_eq!(parse_expression_func(&nested).unwrap(), Expr::Var("x".to_string()));
    }

    #[test]
    fn test_empty_expression() {
        assert!(parse_expression_func("").is_err());
        assert!(parse_expression_func("   ").is_err());
    }

    #[test]
    fn test_invalid_expression() {
        assert!(parse_expression_func("(x +").is_err());
        assert!(parse_expression_func("x**").is_err());
        assert!(parse_expression_func("x + * 2").is_err());
        assert!(parse_expression_func("x $ 2").is_err());
    }

    #[test]
    fn test_unmatched_brackets() {
        let result = parse_expression_func("(x + y");
        assert!(result.unwrap_err().contains("unbalanced"));
        assert!(parse_expression_func("x + y)").is_err());
    }

    #[test]
    fn test_implicit_multiplication_rejected() {
        let err = parse_expression_func("2x").unwrap_err();
        assert!(err.contains("implicit multiplication"), "{}", err);
        assert!(parse_expression_func("2(x+1)").is_err());
    }

    #[test]
    fn test_unknown_function() {
        let err = parse_expression_func("foo(x)").unwrap_err();
        assert_eq!(err, "unknown function 'foo'");
    }
}
