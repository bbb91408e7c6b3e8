use thiserror::Error;

/// Largest magnitude at which every whole `f64` is exactly an integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Text shown in place of a result when evaluation fails.
pub const SYNTAX_ERROR: &str = "Syntax Error";

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,
    #[error("evaluator rejected expression: {0}")]
    Evaluator(#[from] evalexpr::EvalexprError),
    #[error("result is not finite: {0}")]
    NonFinite(f64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Number(String),
    Op(char),
    Open,
    Close,
    Other(char),
}

impl Token {
    fn as_text(&self) -> String {
        match self {
            Token::Number(lit) => lit.clone(),
            Token::Op(c) | Token::Other(c) => c.to_string(),
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
        }
    }
}

/// Map display glyphs to evaluator operators. `%` becomes a literal `/100`.
pub fn normalize(text: &str) -> String {
    text.replace(['x', '×'], "*")
        .replace('÷', "/")
        .replace('%', "/100")
}

/// Integer literals become float literals so `/` divides exactly.
fn widen(lit: &str) -> String {
    if !lit.chars().any(|c| c.is_ascii_digit()) {
        return lit.to_string();
    }
    let mut widened = match lit.strip_prefix('.') {
        Some(frac) => format!("0.{frac}"),
        None => lit.to_string(),
    };
    if widened.ends_with('.') {
        widened.push('0');
    } else if !widened.contains('.') {
        widened.push_str(".0");
    }
    widened
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            c if c.is_ascii_digit() || c == '.' => {
                let mut lit = c.to_string();
                while let Some(&next) = chars.peek() {
                    if !(next.is_ascii_digit() || next == '.') {
                        break;
                    }
                    lit.push(next);
                    chars.next();
                }
                tokens.push(Token::Number(widen(&lit)));
            }
            '+' | '-' | '*' | '/' | '^' => tokens.push(Token::Op(c)),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            other => tokens.push(Token::Other(other)),
        }
    }
    tokens
}

/// Juxtaposition means multiplication: `2(3)`, `(2)(3)` and `(2)3`.
fn insert_implicit_products(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let implicit = match (out.last(), &token) {
            (Some(Token::Number(_) | Token::Close), Token::Open) => true,
            (Some(Token::Close), Token::Number(_)) => true,
            _ => false,
        };
        if implicit {
            out.push(Token::Op('*'));
        }
        out.push(token);
    }
    out
}

/// Index just past the group opened at `open`, or the end if unbalanced.
fn matching_close(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::Open => depth += 1,
            Token::Close => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}

/// Index just past the right operand of a `^` that starts at `start`: any
/// unary signs, one number or group, then further `^` links of the chain.
fn power_operand_end(tokens: &[Token], start: usize) -> usize {
    let mut i = start;
    loop {
        while matches!(tokens.get(i), Some(Token::Op('+' | '-'))) {
            i += 1;
        }
        match tokens.get(i) {
            Some(Token::Open) => i = matching_close(tokens, i),
            Some(Token::Number(_) | Token::Other(_)) => i += 1,
            _ => return i,
        }
        if tokens.get(i) == Some(&Token::Op('^')) {
            i += 1;
        } else {
            return i;
        }
    }
}

/// Wrap the right operand of every `^` in parentheses so chains associate
/// to the right: `2 ^ 3 ^ 2` is `2 ^ (3 ^ 2)`.
fn group_powers(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;
        if *token != Token::Op('^') {
            out.push(token.clone());
            continue;
        }
        let end = power_operand_end(tokens, i);
        out.push(Token::Op('^'));
        out.push(Token::Open);
        out.extend(group_powers(&tokens[i..end]));
        out.push(Token::Close);
        i = end;
    }
    out
}

/// The display expression rewritten as evaluator input.
fn prepare(text: &str) -> String {
    let tokens = insert_implicit_products(tokenize(&normalize(text)));
    group_powers(&tokens)
        .iter()
        .map(Token::as_text)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn evaluate(text: &str) -> Result<f64, EvalError> {
    if text.trim().is_empty() {
        return Err(EvalError::Empty);
    }
    let prepared = prepare(text);
    log::debug!("evaluating {prepared:?}");
    let value = evalexpr::eval(&prepared)?.as_number()?;
    if !value.is_finite() {
        return Err(EvalError::NonFinite(value));
    }
    Ok(value)
}

/// Whole numbers render without a fractional part; everything else uses the
/// shortest decimal form of the double.
pub fn format_result(value: f64) -> String {
    if value.is_finite() && value == value.trunc() && value.abs() < MAX_EXACT_INTEGER {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
