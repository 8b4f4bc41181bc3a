//! Restricted arithmetic evaluator backing the `calculator` tool.
//!
//! Model-supplied expressions are tokenized and parsed here; nothing is
//! ever handed to a general-purpose interpreter. The only names that
//! resolve are the functions in [`ALLOWED_FUNCTIONS`].
//!
//! Semantics follow familiar calculator conventions: `/` always yields a
//! float, `//` and `%` floor toward negative infinity, `**` is right
//! associative and binds tighter than a leading unary minus. Integers are
//! exact up to `i128`; past that they continue as floats.

use std::fmt;

use thiserror::Error;

/// Functions an expression may call.
pub const ALLOWED_FUNCTIONS: [&str; 6] = ["abs", "round", "min", "max", "pow", "sum"];

const MAX_DEPTH: usize = 64;
const MAX_INPUT_LEN: usize = 4096;

/// Reasons an expression fails to evaluate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExprError {
    #[error("invalid syntax: {0}")]
    Syntax(String),
    #[error("name '{0}' is not defined")]
    UnknownName(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("numerical result out of range")]
    Overflow,
    #[error("{0}")]
    Type(String),
    #[error("expression nested too deeply")]
    TooDeep,
    #[error("expression longer than {MAX_INPUT_LEN} characters")]
    TooLong,
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i128),
    Float(f64),
    List(Vec<Value>),
}

impl Value {
    fn as_f64(&self) -> Result<f64, ExprError> {
        match self {
            Value::Int(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            Value::List(_) => Err(ExprError::Type("expected a number, found a list".into())),
        }
    }

    fn expect_number(self) -> Result<Value, ExprError> {
        match self {
            Value::List(_) => Err(ExprError::Type("expected a number, found a list".into())),
            number => Ok(number),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Render a float the way a calculator user expects: always with a
/// fractional part or exponent, scientific notation outside `[1e-4, 1e16)`.
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".into() } else { "-inf".into() };
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0".into() } else { "0.0".into() };
    }
    let abs = x.abs();
    if !(1e-4..1e16).contains(&abs) {
        let sci = format!("{x:e}");
        if let Some((mantissa, exponent)) = sci.split_once('e') {
            if let Ok(exp) = exponent.parse::<i32>() {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{mantissa}e{sign}{:02}", exp.abs());
            }
        }
        return sci;
    }
    let plain = format!("{x}");
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<Value, ExprError> {
    if input.len() > MAX_INPUT_LEN {
        return Err(ExprError::TooLong);
    }
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    match parser.peek() {
        None => Ok(value),
        Some(tok) => Err(ExprError::Syntax(format!("unexpected '{tok}'"))),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i128),
    Float(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(i) => write!(f, "{i}"),
            Token::Float(x) => write!(f, "{x}"),
            Token::Ident(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::DoubleStar => f.write_str("**"),
            Token::Slash => f.write_str("/"),
            Token::DoubleSlash => f.write_str("//"),
            Token::Percent => f.write_str("%"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::Comma => f.write_str(","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                let mut is_float = false;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    is_float |= chars[i] == '.';
                    i += 1;
                }
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        is_float = true;
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                if is_float {
                    let value = text
                        .parse::<f64>()
                        .map_err(|_| ExprError::Syntax(format!("bad number '{text}'")))?;
                    tokens.push(Token::Float(value));
                } else if let Ok(value) = text.parse::<i128>() {
                    tokens.push(Token::Int(value));
                } else {
                    let value = text
                        .parse::<f64>()
                        .map_err(|_| ExprError::Syntax(format!("bad number '{text}'")))?;
                    tokens.push(Token::Float(value));
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::DoubleStar);
                i += 2;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                tokens.push(Token::DoubleSlash);
                i += 2;
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    ',' => Token::Comma,
                    other => return Err(ExprError::Syntax(format!("unexpected character '{other}'"))),
                };
                tokens.push(token);
                i += 1;
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ExprError> {
        match self.next() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(ExprError::Syntax(format!("expected '{expected}', found '{tok}'"))),
            None => Err(ExprError::Syntax(format!("expected '{expected}' before end of input"))),
        }
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Value, ExprError> {
        self.enter()?;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = apply(op, lhs, rhs)?;
        }
        self.depth -= 1;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Value, ExprError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::DoubleSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = apply(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Value, ExprError> {
        if self.eat(&Token::Minus) {
            self.enter()?;
            let value = negate(self.factor()?)?;
            self.depth -= 1;
            return Ok(value);
        }
        if self.eat(&Token::Plus) {
            self.enter()?;
            let value = self.factor()?.expect_number()?;
            self.depth -= 1;
            return Ok(value);
        }
        self.power()
    }

    fn power(&mut self) -> Result<Value, ExprError> {
        let base = self.primary()?;
        if self.eat(&Token::DoubleStar) {
            // Right associative; the exponent may itself carry a unary sign.
            self.enter()?;
            let exponent = self.factor()?;
            self.depth -= 1;
            return apply(BinOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Value, ExprError> {
        match self.next() {
            Some(Token::Int(i)) => Ok(Value::Int(i)),
            Some(Token::Float(f)) => Ok(Value::Float(f)),
            Some(Token::LParen) => {
                let items = self.sequence(Token::RParen)?;
                match items {
                    Sequence::Single(value) => Ok(value),
                    Sequence::Many(values) => Ok(Value::List(values)),
                }
            }
            Some(Token::LBracket) => match self.sequence(Token::RBracket)? {
                Sequence::Single(value) => Ok(Value::List(vec![value])),
                Sequence::Many(values) => Ok(Value::List(values)),
            },
            Some(Token::Ident(name)) => {
                if !ALLOWED_FUNCTIONS.contains(&name.as_str()) || self.peek() != Some(&Token::LParen) {
                    return Err(ExprError::UnknownName(name));
                }
                self.pos += 1;
                let args = match self.sequence(Token::RParen)? {
                    Sequence::Single(value) => vec![value],
                    Sequence::Many(values) => values,
                };
                call_function(&name, args)
            }
            Some(tok) => Err(ExprError::Syntax(format!("unexpected '{tok}'"))),
            None => Err(ExprError::Syntax("unexpected end of input".into())),
        }
    }

    /// Parse a comma-separated sequence up to `close`. A single item
    /// without a trailing comma is reported as `Single`.
    fn sequence(&mut self, close: Token) -> Result<Sequence, ExprError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while self.peek() != Some(&close) {
            items.push(self.expression()?);
            trailing_comma = self.eat(&Token::Comma);
            if !trailing_comma {
                break;
            }
        }
        self.expect(close)?;
        if items.len() == 1 && !trailing_comma {
            return Ok(Sequence::Single(items.remove(0)));
        }
        Ok(Sequence::Many(items))
    }
}

enum Sequence {
    Single(Value),
    Many(Vec<Value>),
}

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

fn negate(value: Value) -> Result<Value, ExprError> {
    match value {
        Value::Int(i) => Ok(i.checked_neg().map_or(Value::Float(-(i as f64)), Value::Int)),
        Value::Float(f) => Ok(Value::Float(-f)),
        Value::List(_) => Err(ExprError::Type("bad operand type for unary -: 'list'".into())),
    }
}

fn apply(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ExprError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(op, a, b),
        (Value::List(a), Value::List(b)) if matches!(op, BinOp::Add) => {
            Ok(Value::List(a.into_iter().chain(b).collect()))
        }
        (Value::List(_), _) | (_, Value::List(_)) => Err(ExprError::Type(format!(
            "unsupported operand type(s) for {}: list",
            op_symbol(op)
        ))),
        (a, b) => float_op(op, a.as_f64()?, b.as_f64()?),
    }
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::FloorDiv => "//",
        BinOp::Mod => "%",
        BinOp::Pow => "**",
    }
}

fn int_op(op: BinOp, a: i128, b: i128) -> Result<Value, ExprError> {
    let exact = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            return Ok(Value::Float(a as f64 / b as f64));
        }
        BinOp::FloorDiv => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            a.checked_div(b).map(|q| {
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    q - 1
                } else {
                    q
                }
            })
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(ExprError::DivisionByZero);
            }
            a.checked_rem(b).map(|r| {
                if r != 0 && ((r < 0) != (b < 0)) {
                    r + b
                } else {
                    r
                }
            })
        }
        BinOp::Pow => {
            if b < 0 {
                return float_op(op, a as f64, b as f64);
            }
            u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp))
        }
    };
    match exact {
        Some(value) => Ok(Value::Int(value)),
        // Past i128 the result continues as a float.
        None => float_op(op, a as f64, b as f64),
    }
}

fn float_op(op: BinOp, a: f64, b: f64) -> Result<Value, ExprError> {
    let value = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            a / b
        }
        BinOp::FloorDiv => {
            if b == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            (a / b).floor()
        }
        BinOp::Mod => {
            if b == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            a - b * (a / b).floor()
        }
        BinOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            let value = a.powf(b);
            if value.is_infinite() && a.is_finite() && b.is_finite() {
                return Err(ExprError::Overflow);
            }
            value
        }
    };
    Ok(Value::Float(value))
}

fn call_function(name: &str, args: Vec<Value>) -> Result<Value, ExprError> {
    match name {
        "abs" => {
            let [arg] = exact_args::<1>(name, args)?;
            match arg {
                Value::Int(i) => Ok(i.checked_abs().map_or(Value::Float((i as f64).abs()), Value::Int)),
                Value::Float(f) => Ok(Value::Float(f.abs())),
                Value::List(_) => Err(ExprError::Type("bad operand type for abs(): 'list'".into())),
            }
        }
        "round" => round(args),
        "pow" => {
            let [base, exponent] = exact_args::<2>(name, args)?;
            apply(BinOp::Pow, base.expect_number()?, exponent.expect_number()?)
        }
        "min" => extremum(name, args, |candidate, best| candidate < best),
        "max" => extremum(name, args, |candidate, best| candidate > best),
        "sum" => {
            let mut args = args.into_iter();
            let items = match args.next() {
                Some(Value::List(items)) => items,
                Some(_) => return Err(ExprError::Type("sum() expects a list".into())),
                None => return Err(ExprError::Type("sum() takes at least 1 argument (0 given)".into())),
            };
            let start = args.next().unwrap_or(Value::Int(0));
            if args.next().is_some() {
                return Err(ExprError::Type("sum() takes at most 2 arguments".into()));
            }
            items
                .into_iter()
                .try_fold(start.expect_number()?, |acc, item| {
                    apply(BinOp::Add, acc, item.expect_number()?)
                })
        }
        other => Err(ExprError::UnknownName(other.to_string())),
    }
}

fn exact_args<const N: usize>(name: &str, args: Vec<Value>) -> Result<[Value; N], ExprError> {
    let given = args.len();
    args.try_into().map_err(|_| {
        ExprError::Type(format!("{name}() takes exactly {N} argument(s) ({given} given)"))
    })
}

fn round(args: Vec<Value>) -> Result<Value, ExprError> {
    let mut args = args.into_iter();
    let value = args
        .next()
        .ok_or_else(|| ExprError::Type("round() missing required argument".into()))?;
    let digits = args.next();
    if args.next().is_some() {
        return Err(ExprError::Type("round() takes at most 2 arguments".into()));
    }
    let digits = match digits {
        None => None,
        Some(Value::Int(d)) => Some(i32::try_from(d).map_err(|_| ExprError::Overflow)?),
        Some(_) => return Err(ExprError::Type("round() digits must be an integer".into())),
    };
    match (value, digits) {
        (Value::Int(i), Some(d)) if d < 0 => Ok(round_int(i, d.unsigned_abs())),
        (Value::Int(i), _) => Ok(Value::Int(i)),
        (Value::Float(f), None) => {
            let rounded = f.round_ties_even();
            if !rounded.is_finite() {
                return Err(ExprError::Overflow);
            }
            if rounded.abs() < i128::MAX as f64 {
                Ok(Value::Int(rounded as i128))
            } else {
                Ok(Value::Float(rounded))
            }
        }
        (Value::Float(f), Some(d)) => {
            let scale = 10f64.powi(d);
            Ok(Value::Float((f * scale).round_ties_even() / scale))
        }
        (Value::List(_), _) => Err(ExprError::Type("round() expects a number".into())),
    }
}

/// Round an integer to a multiple of `10^places`, ties to even.
fn round_int(value: i128, places: u32) -> Value {
    let Some(factor) = 10i128.checked_pow(places) else {
        return Value::Int(0);
    };
    let quotient = value.div_euclid(factor);
    let remainder = value.rem_euclid(factor);
    let rest = factor - remainder;
    let quotient = if remainder > rest || (remainder == rest && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    };
    quotient
        .checked_mul(factor)
        .map_or(Value::Float(quotient as f64 * factor as f64), Value::Int)
}

fn extremum(
    name: &str,
    args: Vec<Value>,
    better: impl Fn(f64, f64) -> bool,
) -> Result<Value, ExprError> {
    let candidates = match args.len() {
        0 => return Err(ExprError::Type(format!("{name}() expected at least 1 argument"))),
        1 => match args.into_iter().next() {
            Some(Value::List(items)) => items,
            _ => return Err(ExprError::Type(format!("{name}() expects a list or several numbers"))),
        },
        _ => args,
    };
    let mut best: Option<(f64, Value)> = None;
    for candidate in candidates {
        let key = candidate.as_f64()?;
        let replace = match &best {
            Some((best_key, _)) => better(key, *best_key),
            None => true,
        };
        if replace {
            best = Some((key, candidate));
        }
    }
    best.map(|(_, value)| value)
        .ok_or_else(|| ExprError::Type(format!("{name}() arg is an empty sequence")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(input: &str) -> String {
        evaluate(input).map(|v| v.to_string()).unwrap_or_else(|e| format!("error: {e}"))
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        assert_eq!(eval("2 + 3"), "5");
        assert_eq!(eval("4 * 5"), "20");
        assert_eq!(eval("2 + 3 * 4"), "14");
        assert_eq!(eval("(2 + 3) * 4"), "20");
        assert_eq!(eval("2 ** 10"), "1024");
    }

    #[test]
    fn true_division_yields_float() {
        assert_eq!(eval("10 / 4"), "2.5");
        assert_eq!(eval("10 / 5"), "2.0");
        assert_eq!(eval("1 / 3"), "0.3333333333333333");
    }

    #[test]
    fn floor_division_and_modulo_round_toward_negative_infinity() {
        assert_eq!(eval("7 // 2"), "3");
        assert_eq!(eval("-7 // 2"), "-4");
        assert_eq!(eval("-7 % 3"), "2");
        assert_eq!(eval("7 % -3"), "-2");
        assert_eq!(eval("7.5 // 2"), "3.0");
    }

    #[test]
    fn power_is_right_associative_and_binds_tighter_than_unary_minus() {
        assert_eq!(eval("2 ** 3 ** 2"), "512");
        assert_eq!(eval("-2 ** 2"), "-4");
        assert_eq!(eval("2 ** -1"), "0.5");
    }

    #[test]
    fn allow_listed_functions() {
        assert_eq!(eval("abs(-3)"), "3");
        assert_eq!(eval("round(2.5)"), "2");
        assert_eq!(eval("round(3.14159, 2)"), "3.14");
        assert_eq!(eval("min(4, 2, 8)"), "2");
        assert_eq!(eval("max([1, 9.5, 3])"), "9.5");
        assert_eq!(eval("pow(2, 8)"), "256");
        assert_eq!(eval("sum([1, 2, 3])"), "6");
        assert_eq!(eval("sum((1.5, 2), 10)"), "13.5");
    }

    #[test]
    fn float_formatting_keeps_fraction_or_exponent() {
        assert_eq!(eval("1e16 * 1.0"), "1e+16");
        assert_eq!(eval("0.00001 * 1"), "1e-05");
        assert_eq!(eval("3.0"), "3.0");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(evaluate("invalid"), Err(ExprError::UnknownName("invalid".into())));
        assert_eq!(
            evaluate("__import__(os)"),
            Err(ExprError::UnknownName("__import__".into()))
        );
        assert_eq!(evaluate("abs"), Err(ExprError::UnknownName("abs".into())));
    }

    #[test]
    fn malformed_input_is_a_syntax_error() {
        assert!(matches!(evaluate("2 +"), Err(ExprError::Syntax(_))));
        assert!(matches!(evaluate("(1"), Err(ExprError::Syntax(_))));
        assert!(matches!(evaluate("1 2"), Err(ExprError::Syntax(_))));
        assert!(matches!(evaluate("'x'"), Err(ExprError::Syntax(_))));
    }

    #[test]
    fn arithmetic_failures_are_reported() {
        assert_eq!(evaluate("1 / 0"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("5 % 0"), Err(ExprError::DivisionByZero));
        assert!(matches!(evaluate("min([])"), Err(ExprError::Type(_))));
    }

    #[test]
    fn zero_to_a_negative_power_is_division_by_zero() {
        assert_eq!(evaluate("0 ** -1"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("0.0 ** -2.5"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("pow(0, -3)"), Err(ExprError::DivisionByZero));
    }

    #[test]
    fn float_power_overflow_is_an_error() {
        assert_eq!(evaluate("10.0 ** 400"), Err(ExprError::Overflow));
        assert_eq!(evaluate("2 ** 5000"), Err(ExprError::Overflow));
        assert_eq!(eval("1e308 * 10"), "inf");
    }

    #[test]
    fn large_integers_stay_exact() {
        assert_eq!(eval("2 ** 64"), "18446744073709551616");
        assert_eq!(eval("9223372036854775807 + 1"), "9223372036854775808");
        assert_eq!(eval("-(2 ** 100)"), "-1267650600228229401496703205376");
        assert_eq!(eval("2 ** 200"), "1.6069380442589903e+60");
    }

    #[test]
    fn round_with_negative_digits_scales_integers() {
        assert_eq!(eval("round(1234, -2)"), "1200");
        assert_eq!(eval("round(1250, -2)"), "1200");
        assert_eq!(eval("round(1350, -2)"), "1400");
        assert_eq!(eval("round(-1260, -1)"), "-1260");
        assert_eq!(eval("round(-1265, -1)"), "-1260");
        assert_eq!(eval("round(1234, 2)"), "1234");
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let nested = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(evaluate(&nested), Err(ExprError::TooDeep));
    }
}
