//! Safe arithmetic evaluator for the `calculate` tool
//!
//! Grammar, lowest precedence first:
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | NAME | NAME '(' args ')' | '(' expr ')' | '[' args ']'
//! ```
//! Integers stay integral under `+ - * // % **`; `/` always yields a float.

use std::fmt;

/// Longest accepted expression, in characters
const MAX_EXPRESSION_LEN: usize = 4096;

/// Deepest accepted nesting of signs, parentheses, brackets and powers
const MAX_DEPTH: usize = 128;

/// A numeric result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) if x.is_nan() => write!(f, "nan"),
            Number::Float(x) if x.is_infinite() => {
                write!(f, "{}", if x > 0.0 { "inf" } else { "-inf" })
            }
            Number::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{:.1}", x),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Num(Number),
    List(Vec<Number>),
}

impl Value {
    fn number(self) -> Result<Number, String> {
        match self {
            Value::Num(n) => Ok(n),
            Value::List(_) => Err("unsupported operand type(s): 'list'".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Float(f64),
    Name(String),
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

/// Evaluate `expression`; the error string describes what went wrong
pub fn evaluate(expression: &str) -> Result<Number, String> {
    if expression.chars().count() > MAX_EXPRESSION_LEN {
        return Err(format!(
            "expression longer than {} characters",
            MAX_EXPRESSION_LEN
        ));
    }
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(format!("invalid syntax near {:?}", tok));
    }
    value.number()
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                let mut is_float = false;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == '_') {
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
                let text: String = chars[start..i].iter().filter(|c| **c != '_').collect();
                if is_float {
                    let f = text
                        .parse::<f64>()
                        .map_err(|_| format!("invalid number '{}'", text))?;
                    tokens.push(Token::Float(f));
                } else {
                    match text.parse::<i64>() {
                        Ok(n) => tokens.push(Token::Int(n)),
                        Err(_) => {
                            let f = text
                                .parse::<f64>()
                                .map_err(|_| format!("invalid number '{}'", text))?;
                            tokens.push(Token::Float(f));
                        }
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Name(chars[start..i].iter().collect()));
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
                let tok = match c {
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
                    other => return Err(format!("invalid character '{}'", other)),
                };
                tokens.push(tok);
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
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(format!("expected {:?}", expected))
        }
    }

    fn expr(&mut self) -> Result<Value, String> {
        let mut left = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                let right = self.term()?;
                left = Value::Num(add(left.number()?, right.number()?)?);
            } else if self.eat(&Token::Minus) {
                let right = self.term()?;
                left = Value::Num(sub(left.number()?, right.number()?)?);
            } else {
                return Ok(left);
            }
        }
    }

    fn term(&mut self) -> Result<Value, String> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => Token::Star,
                Some(Token::Slash) => Token::Slash,
                Some(Token::DoubleSlash) => Token::DoubleSlash,
                Some(Token::Percent) => Token::Percent,
                _ => return Ok(left),
            };
            self.pos += 1;
            let (a, b) = (left.number()?, self.unary()?.number()?);
            left = Value::Num(match op {
                Token::Star => mul(a, b)?,
                Token::Slash => div(a, b)?,
                Token::DoubleSlash => floor_div(a, b)?,
                _ => modulo(a, b)?,
            });
        }
    }

    /// Every recursive path (signs, `**`, parentheses, brackets, calls)
    /// passes through here, so the depth bound covers all of them.
    fn unary(&mut self) -> Result<Value, String> {
        if self.depth >= MAX_DEPTH {
            return Err("expression too deeply nested".to_string());
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<Value, String> {
        if self.eat(&Token::Minus) {
            let n = self.unary()?.number()?;
            return Ok(Value::Num(match n {
                Number::Int(i) => Number::Int(i.checked_neg().ok_or("integer overflow")?),
                Number::Float(f) => Number::Float(-f),
            }));
        }
        if self.eat(&Token::Plus) {
            return Ok(Value::Num(self.unary()?.number()?));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Value, String> {
        let base = self.primary()?;
        if self.eat(&Token::DoubleStar) {
            let exp = self.unary()?.number()?;
            return Ok(Value::Num(pow(base.number()?, exp)?));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Value, String> {
        match self.next() {
            Some(Token::Int(i)) => Ok(Value::Num(Number::Int(i))),
            Some(Token::Float(f)) => Ok(Value::Num(Number::Float(f))),
            Some(Token::LParen) => {
                let v = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(v)
            }
            Some(Token::LBracket) => {
                let items = self.args(Token::RBracket)?;
                Ok(Value::List(items))
            }
            Some(Token::Name(name)) => {
                if self.eat(&Token::LParen) {
                    let args = self.args(Token::RParen)?;
                    call(&name, args).map(Value::Num)
                } else {
                    constant(&name).map(Value::Num)
                }
            }
            Some(tok) => Err(format!("invalid syntax near {:?}", tok)),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    /// Comma-separated arguments up to `close`; a lone list argument is spread
    fn args(&mut self, close: Token) -> Result<Vec<Number>, String> {
        let mut values = Vec::new();
        if self.eat(&close) {
            return Ok(values);
        }
        loop {
            match self.expr()? {
                Value::Num(n) => values.push(n),
                Value::List(items) => values.extend(items),
            }
            if self.eat(&close) {
                return Ok(values);
            }
            self.expect(Token::Comma)?;
            if self.eat(&close) {
                return Ok(values);
            }
        }
    }
}

fn constant(name: &str) -> Result<Number, String> {
    match name {
        "pi" => Ok(Number::Float(std::f64::consts::PI)),
        "e" => Ok(Number::Float(std::f64::consts::E)),
        _ => Err(format!("name '{}' is not defined", name)),
    }
}

fn call(name: &str, args: Vec<Number>) -> Result<Number, String> {
    let arity = |n: usize| -> Result<(), String> {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!("{}() takes exactly {} argument(s) ({} given)", name, n, args.len()))
        }
    };

    match name {
        "abs" => {
            arity(1)?;
            Ok(match args[0] {
                Number::Int(i) => Number::Int(i.checked_abs().ok_or("integer overflow")?),
                Number::Float(f) => Number::Float(f.abs()),
            })
        }
        "round" => match args.as_slice() {
            [Number::Int(i)] => Ok(Number::Int(*i)),
            [Number::Float(f)] => {
                let r = f.round_ties_even();
                if r.is_finite() && r.abs() < i64::MAX as f64 {
                    Ok(Number::Int(r as i64))
                } else {
                    Err("cannot convert float to integer".to_string())
                }
            }
            [x, Number::Int(digits)] => {
                let scale = 10f64.powi((*digits).clamp(-308, 308) as i32);
                match x {
                    Number::Int(i) if *digits >= 0 => Ok(Number::Int(*i)),
                    Number::Int(i) => Ok(Number::Int(((*i as f64 * scale).round_ties_even() / scale) as i64)),
                    Number::Float(f) => Ok(Number::Float((f * scale).round_ties_even() / scale)),
                }
            }
            _ => Err("round() takes a number and optional integer digits".to_string()),
        },
        "min" | "max" => {
            let mut iter = args.into_iter();
            let first = iter
                .next()
                .ok_or_else(|| format!("{}() arg is an empty sequence", name))?;
            Ok(iter.fold(first, |acc, n| {
                let take = if name == "min" {
                    n.as_f64() < acc.as_f64()
                } else {
                    n.as_f64() > acc.as_f64()
                };
                if take {
                    n
                } else {
                    acc
                }
            }))
        }
        "sum" => args.into_iter().try_fold(Number::Int(0), add),
        "pow" => {
            arity(2)?;
            pow(args[0], args[1])
        }
        "sqrt" => {
            arity(1)?;
            let x = args[0].as_f64();
            if x < 0.0 {
                return Err("math domain error".to_string());
            }
            Ok(Number::Float(x.sqrt()))
        }
        "sin" | "cos" | "tan" => {
            arity(1)?;
            let x = args[0].as_f64();
            Ok(Number::Float(match name {
                "sin" => x.sin(),
                "cos" => x.cos(),
                _ => x.tan(),
            }))
        }
        "log" => {
            let (x, base) = match args.as_slice() {
                [x] => (x.as_f64(), None),
                [x, b] => (x.as_f64(), Some(b.as_f64())),
                _ => return Err("log() takes 1 or 2 arguments".to_string()),
            };
            if x <= 0.0 || base.is_some_and(|b| b <= 0.0 || b == 1.0) {
                return Err("math domain error".to_string());
            }
            Ok(Number::Float(match base {
                Some(b) => x.ln() / b.ln(),
                None => x.ln(),
            }))
        }
        "log10" => {
            arity(1)?;
            let x = args[0].as_f64();
            if x <= 0.0 {
                return Err("math domain error".to_string());
            }
            Ok(Number::Float(x.log10()))
        }
        _ => Err(format!("name '{}' is not defined", name)),
    }
}

fn add(a: Number, b: Number) -> Result<Number, String> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_add(y).map(Number::Int).ok_or_else(overflow),
        _ => Ok(Number::Float(a.as_f64() + b.as_f64())),
    }
}

fn sub(a: Number, b: Number) -> Result<Number, String> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_sub(y).map(Number::Int).ok_or_else(overflow),
        _ => Ok(Number::Float(a.as_f64() - b.as_f64())),
    }
}

fn mul(a: Number, b: Number) -> Result<Number, String> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_mul(y).map(Number::Int).ok_or_else(overflow),
        _ => Ok(Number::Float(a.as_f64() * b.as_f64())),
    }
}

fn div(a: Number, b: Number) -> Result<Number, String> {
    if b.as_f64() == 0.0 {
        return Err("division by zero".to_string());
    }
    Ok(Number::Float(a.as_f64() / b.as_f64()))
}

fn floor_div(a: Number, b: Number) -> Result<Number, String> {
    if b.as_f64() == 0.0 {
        return Err("integer division or modulo by zero".to_string());
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let q = x.checked_div(y).ok_or_else(overflow)?;
            Ok(Number::Int(if (x % y != 0) && ((x < 0) != (y < 0)) { q - 1 } else { q }))
        }
        _ => Ok(Number::Float((a.as_f64() / b.as_f64()).floor())),
    }
}

fn modulo(a: Number, b: Number) -> Result<Number, String> {
    if b.as_f64() == 0.0 {
        return Err("integer division or modulo by zero".to_string());
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let r = x.checked_rem(y).ok_or_else(overflow)?;
            Ok(Number::Int(if r != 0 && ((r < 0) != (y < 0)) { r + y } else { r }))
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            Ok(Number::Float(x - y * (x / y).floor()))
        }
    }
}

fn pow(a: Number, b: Number) -> Result<Number, String> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) if y >= 0 => {
            let exp = u32::try_from(y).map_err(|_| overflow())?;
            x.checked_pow(exp).map(Number::Int).ok_or_else(overflow)
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            if x == 0.0 && y < 0.0 {
                return Err("0.0 cannot be raised to a negative power".to_string());
            }
            Ok(Number::Float(x.powf(y)))
        }
    }
}

fn overflow() -> String {
    "integer overflow".to_string()
}

/// Render a calculation result (or failure) for the agent
pub fn calculate(expression: &str) -> String {
    match evaluate(expression) {
        Ok(result) => format!("Result: {}\n\nCalculation: {} = {}", result, expression, result),
        Err(e) => {
            tracing::debug!(expression, error = %e, "Calculation failed");
            format!("Error in calculation: {}\nPlease check your expression.", e)
        }
    }
}
