use crate::error::EvalError;
use crate::traits::{ExpressionEvaluator, Scalar, ScalarFunction};
use std::collections::HashMap;

/// Name of the single free variable in user expressions.
pub const FREE_VARIABLE: &str = "x";

/// Built-in functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Sqrt,
    Abs,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            "exp" => Some(Function::Exp),
            "log" => Some(Function::Log),
            "sqrt" => Some(Function::Sqrt),
            "abs" => Some(Function::Abs),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
        }
    }

    fn apply<T: Scalar>(self, a: T) -> Result<T, EvalError> {
        match self {
            Function::Sin => Ok(a.sin()),
            Function::Cos => Ok(a.cos()),
            Function::Tan => Ok(a.tan()),
            Function::Exp => Ok(a.exp()),
            Function::Log if a <= T::zero() => Err(self.out_of_domain(a)),
            Function::Log => Ok(a.ln()),
            Function::Sqrt if a < T::zero() => Err(self.out_of_domain(a)),
            Function::Sqrt => Ok(a.sqrt()),
            Function::Abs => Ok(a.abs()),
        }
    }

    fn out_of_domain<T: Scalar>(self, argument: T) -> EvalError {
        EvalError::OutOfDomain {
            function: self.name(),
            argument: argument.to_f64().unwrap_or(f64::NAN),
        }
    }
}

/// Binary operators, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// OpCodes for the Stack-based Virtual Machine.
/// The VM operates on a stack of `Scalar` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpCode {
    /// Pushes a constant `f64` value onto the stack.
    LoadConst(f64),
    /// Pushes the value of a variable (by index) onto the stack.
    LoadVar(usize),
    /// Pops top two values (b, a), pushes (a + b).
    Add,
    /// Pops top two values (b, a), pushes (a - b).
    Sub,
    /// Pops top two values (b, a), pushes (a * b).
    Mul,
    /// Pops top two values (b, a), pushes (a / b). Fails if b is zero.
    Div,
    /// Pops top two values (b, a), pushes (a ^ b).
    Pow,
    /// Pops top value (a), pushes -a.
    Neg,
    /// Pops top value (a), pushes f(a).
    Call(Function),
}

/// Represents a compiled sequence of operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    pub ops: Vec<OpCode>,
}

/// Stack-based Virtual Machine for evaluating expressions.
///
/// The VM is stateless; `execute` takes all necessary context:
/// - `bytecode`: Instructions to run.
/// - `vars`: Variable values, indexed as resolved by the [`Compiler`].
/// - `stack`: A mutable buffer for intermediate computations.
pub struct VM;

impl VM {
    /// Executes the bytecode and returns the value left on the stack.
    pub fn execute<T: Scalar>(
        bytecode: &Bytecode,
        vars: &[T],
        stack: &mut Vec<T>,
    ) -> Result<T, EvalError> {
        stack.clear();

        for op in &bytecode.ops {
            match *op {
                OpCode::LoadConst(val) => {
                    let val = T::from_f64(val).ok_or_else(|| {
                        EvalError::Parse(format!("constant {val} is not representable"))
                    })?;
                    stack.push(val);
                }
                OpCode::LoadVar(idx) => {
                    let val = vars.get(idx).copied().ok_or_else(|| {
                        EvalError::Parse(format!("no value bound for variable #{idx}"))
                    })?;
                    stack.push(val);
                }
                OpCode::Add => {
                    let (a, b) = pop_pair(stack)?;
                    stack.push(a + b);
                }
                OpCode::Sub => {
                    let (a, b) = pop_pair(stack)?;
                    stack.push(a - b);
                }
                OpCode::Mul => {
                    let (a, b) = pop_pair(stack)?;
                    stack.push(a * b);
                }
                OpCode::Div => {
                    let (a, b) = pop_pair(stack)?;
                    if b == T::zero() {
                        return Err(EvalError::DivisionByZero);
                    }
                    stack.push(a / b);
                }
                OpCode::Pow => {
                    let (a, b) = pop_pair(stack)?;
                    stack.push(a.powf(b));
                }
                OpCode::Neg => {
                    let a = pop(stack)?;
                    stack.push(-a);
                }
                OpCode::Call(function) => {
                    let a = pop(stack)?;
                    stack.push(function.apply(a)?);
                }
            }
        }

        let result = pop(stack)?;
        if !stack.is_empty() {
            return Err(EvalError::MalformedBytecode);
        }
        Ok(result)
    }
}

fn pop<T>(stack: &mut Vec<T>) -> Result<T, EvalError> {
    stack.pop().ok_or(EvalError::MalformedBytecode)
}

fn pop_pair<T>(stack: &mut Vec<T>) -> Result<(T, T), EvalError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    Ok((a, b))
}

// --- AST & Compiler ---

/// Abstract Syntax Tree nodes for expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    Neg(Box<Expr>),
    Call(Function, Box<Expr>),
}

/// Compiles an AST (`Expr`) into `Bytecode`.
/// Resolves variable names to indices and named constants to values.
pub struct Compiler {
    pub var_map: HashMap<String, usize>,
}

impl Compiler {
    pub fn new(var_names: &[&str]) -> Self {
        let var_map = var_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();
        Self { var_map }
    }

    pub fn compile(&self, expr: &Expr) -> Result<Bytecode, EvalError> {
        let mut ops = Vec::new();
        self.compile_recursive(expr, &mut ops)?;
        Ok(Bytecode { ops })
    }

    fn compile_recursive(&self, expr: &Expr, ops: &mut Vec<OpCode>) -> Result<(), EvalError> {
        match expr {
            Expr::Number(n) => ops.push(OpCode::LoadConst(*n)),
            Expr::Variable(name) => {
                if let Some(&idx) = self.var_map.get(name) {
                    ops.push(OpCode::LoadVar(idx));
                } else if let Some(value) = named_constant(name) {
                    ops.push(OpCode::LoadConst(value));
                } else {
                    return Err(EvalError::Parse(format!("unknown variable: {name}")));
                }
            }
            Expr::Binary(left, op, right) => {
                self.compile_recursive(left, ops)?;
                self.compile_recursive(right, ops)?;
                ops.push(match op {
                    BinaryOp::Add => OpCode::Add,
                    BinaryOp::Sub => OpCode::Sub,
                    BinaryOp::Mul => OpCode::Mul,
                    BinaryOp::Div => OpCode::Div,
                    BinaryOp::Pow => OpCode::Pow,
                });
            }
            Expr::Neg(operand) => {
                self.compile_recursive(operand, ops)?;
                ops.push(OpCode::Neg);
            }
            Expr::Call(function, arg) => {
                self.compile_recursive(arg, ops)?;
                ops.push(OpCode::Call(*function));
            }
        }
        Ok(())
    }
}

fn named_constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

// --- Parser ---

/// Parses a string expression into an AST.
///
/// Precedence from loosest to tightest: `+ -`, `* /`, unary minus, `^`.
/// `^` is right-associative, so `2^3^2` is `2^9` and `-x^2` is `-(x^2)`.
pub fn parse(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expression()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(EvalError::Parse(format!("unexpected {token:?} after expression"))),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // Exponent part, only when a digit follows: `2e3` but not `2*e`.
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse()
                .map_err(|_| EvalError::Parse(format!("invalid number: {text}")))?;
            tokens.push(Token::Number(value));
        } else if c.is_alphabetic() {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Identifier(chars[start..i].iter().collect()));
        } else {
            tokens.push(match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '^' => Token::Caret,
                '(' => Token::LParen,
                ')' => Token::RParen,
                other => return Err(EvalError::Parse(format!("unexpected character '{other}'"))),
            });
            i += 1;
        }
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

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_rparen(&mut self) -> Result<(), EvalError> {
        match self.consume() {
            Some(Token::RParen) => Ok(()),
            _ => Err(EvalError::Parse("expected ')'".to_string())),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.consume();
            let right = self.parse_term()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.consume();
            let right = self.parse_unary()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.consume();
                let operand = self.parse_unary()?;
                Ok(Expr::Neg(Box::new(operand)))
            }
            Some(Token::Plus) => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.consume();
            // Right operand goes back through unary so `2^-1` works.
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(Box::new(base), BinaryOp::Pow, Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Identifier(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.consume();
                    let function = Function::from_name(&name)
                        .ok_or_else(|| EvalError::Parse(format!("unknown function: {name}")))?;
                    let arg = self.parse_expression()?;
                    self.expect_rparen()?;
                    Ok(Expr::Call(function, Box::new(arg)))
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(Token::LParen) => {
                let expr = self.parse_expression()?;
                self.expect_rparen()?;
                Ok(expr)
            }
            Some(token) => Err(EvalError::Parse(format!("unexpected {token:?}"))),
            None => Err(EvalError::Parse("unexpected end of expression".to_string())),
        }
    }
}

// --- Compiled expressions ---

/// An `f(x)` expression compiled once and evaluated many times.
///
/// Holds no interior state, so one instance can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    bytecode: Bytecode,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }
}

impl ScalarFunction for CompiledExpression {
    fn value_at(&self, x: f64) -> Result<f64, EvalError> {
        let mut stack = Vec::with_capacity(16);
        let value = VM::execute(&self.bytecode, &[x], &mut stack)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NotFinite { x })
        }
    }
}

/// Parses and compiles an expression in the free variable `x`.
pub fn compile(expression: &str) -> Result<CompiledExpression, EvalError> {
    let parsed = parse(expression)?;
    let bytecode = Compiler::new(&[FREE_VARIABLE]).compile(&parsed)?;
    Ok(CompiledExpression {
        source: expression.to_string(),
        bytecode,
    })
}

/// The default [`ExpressionEvaluator`]: compiles on every call.
///
/// Prefer [`compile`] when the same expression is sampled repeatedly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEngine;

impl ExpressionEvaluator for ExpressionEngine {
    fn evaluate(&self, expression: &str, x: f64) -> Result<f64, EvalError> {
        compile(expression)?.value_at(x)
    }

    fn validate(&self, expression: &str) -> bool {
        compile(expression).is_ok()
    }
}
