//! Token-level parsing of solidity-style declarations.

use crate::abi::constructor::Constructor;
use crate::abi::event::Event;
use crate::abi::function::{Function, StateMutability};
use crate::abi::registry::TypeEnv;
use crate::abi::sol_error::SolError;
use crate::abi::struct_def::{FieldDeclaration, FieldType, MappingType, SolStruct, StructFieldType};
use crate::abi::ty::{wrap_array_suffixes, EventParam, TupleParam, Type};
use std::{fmt, iter::Peekable, str::CharIndices};
use unicode_xid::UnicodeXID;

pub type Spanned<Token, Loc, Error> = Result<(Loc, Token, Loc), Error>;

macro_rules! unrecognised {
    ($l:ident,$r:ident,$t:expr) => {
        return Err(LexerError::UnrecognisedToken($l, $r, $t))
    };
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Token<'input> {
    Identifier(&'input str),
    Number(&'input str),

    // Punctuation
    OpenParenthesis,
    CloseParenthesis,
    Comma,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Point,
    Arrow,

    Struct,
    Event,
    Error,
    Enum,
    Function,
    Tuple,
    Mapping,

    Memory,
    Storage,
    Calldata,

    Public,
    Private,
    Internal,
    External,

    Constant,

    Type,
    Pure,
    View,
    Payable,
    Returns,
    Anonymous,
    Receive,
    Fallback,
    Abstract,
    Virtual,
    Override,

    Constructor,
    Indexed,

    Uint(u16),
    Int(u16),
    Bytes(u8),
    // prior to 0.8.0 `byte` used to be an alias for `bytes1`
    Byte,
    DynamicBytes,
    Bool,
    Address,
    String,
}

impl<'input> fmt::Display for Token<'input> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(id) => write!(f, "{id}"),
            Token::Number(num) => write!(f, "{num}"),
            Token::Uint(w) => write!(f, "uint{w}"),
            Token::Int(w) => write!(f, "int{w}"),
            Token::Bytes(w) => write!(f, "bytes{w}"),
            Token::Byte => write!(f, "byte"),
            Token::DynamicBytes => write!(f, "bytes"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::OpenParenthesis => write!(f, "("),
            Token::CloseParenthesis => write!(f, ")"),
            Token::OpenBracket => write!(f, "["),
            Token::CloseBracket => write!(f, "]"),
            Token::OpenBrace => write!(f, "{{"),
            Token::CloseBrace => write!(f, "}}"),
            Token::Point => write!(f, "."),
            Token::Arrow => write!(f, "=>"),
            Token::Tuple => write!(f, "tuple"),
            Token::Mapping => write!(f, "mapping"),
            Token::Bool => write!(f, "bool"),
            Token::Address => write!(f, "address"),
            Token::String => write!(f, "string"),
            Token::Function => write!(f, "function"),
            Token::Struct => write!(f, "struct"),
            Token::Event => write!(f, "event"),
            Token::Error => write!(f, "error"),
            Token::Enum => write!(f, "enum"),
            Token::Type => write!(f, "type"),
            Token::Memory => write!(f, "memory"),
            Token::Storage => write!(f, "storage"),
            Token::Calldata => write!(f, "calldata"),
            Token::Public => write!(f, "public"),
            Token::Private => write!(f, "private"),
            Token::Internal => write!(f, "internal"),
            Token::External => write!(f, "external"),
            Token::Constant => write!(f, "constant"),
            Token::Pure => write!(f, "pure"),
            Token::View => write!(f, "view"),
            Token::Payable => write!(f, "payable"),
            Token::Returns => write!(f, "returns"),
            Token::Anonymous => write!(f, "anonymous"),
            Token::Constructor => write!(f, "constructor"),
            Token::Indexed => write!(f, "indexed"),
            Token::Receive => write!(f, "receive"),
            Token::Fallback => write!(f, "fallback"),
            Token::Abstract => write!(f, "abstract"),
            Token::Virtual => write!(f, "virtual"),
            Token::Override => write!(f, "override"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("UnrecognisedToken {0}:{1} `{2}`")]
    UnrecognisedToken(usize, usize, String),
    #[error("UnknownType {0}:{1} `{2}`")]
    UnknownType(usize, usize, String),
    #[error("InvalidArraySize {0}:{1} `{2}`")]
    InvalidArraySize(usize, usize, String),
    #[error("IllegalMappingKey `{0}`")]
    IllegalMappingKey(String),
    #[error("end of file")]
    EndOfFile,
}

pub(crate) struct HumanReadableLexer<'input> {
    input: &'input str,
    chars: Peekable<CharIndices<'input>>,
}

// === impl HumanReadableLexer ===

impl<'input> HumanReadableLexer<'input> {
    /// Creates a new instance of the lexer
    pub fn new(input: &'input str) -> Self {
        Self { chars: input.char_indices().peekable(), input }
    }

    fn next_token(&mut self) -> Option<Spanned<Token<'input>, usize, LexerError>> {
        loop {
            match self.chars.next() {
                Some((start, ch)) if UnicodeXID::is_xid_start(ch) || ch == '_' => {
                    let end;
                    loop {
                        if let Some((i, ch)) = self.chars.peek() {
                            if !UnicodeXID::is_xid_continue(*ch) && *ch != '$' {
                                end = *i;
                                break
                            }
                            self.chars.next();
                        } else {
                            end = self.input.len();
                            break
                        }
                    }
                    let id = &self.input[start..end];

                    return if let Some(w) = keyword(id) {
                        Some(Ok((start, w, end)))
                    } else {
                        Some(Ok((start, Token::Identifier(id), end)))
                    }
                }
                Some((start, ch)) if ch.is_ascii_digit() => {
                    let end;
                    loop {
                        if let Some((i, ch)) = self.chars.peek() {
                            if !ch.is_ascii_digit() {
                                end = *i;
                                break
                            }
                            self.chars.next();
                        } else {
                            end = self.input.len();
                            break
                        }
                    }
                    return Some(Ok((start, Token::Number(&self.input[start..end]), end)))
                }
                Some((i, '(')) => return Some(Ok((i, Token::OpenParenthesis, i + 1))),
                Some((i, ')')) => return Some(Ok((i, Token::CloseParenthesis, i + 1))),
                Some((i, ';')) => return Some(Ok((i, Token::Semicolon, i + 1))),
                Some((i, ',')) => return Some(Ok((i, Token::Comma, i + 1))),
                Some((i, '.')) => return Some(Ok((i, Token::Point, i + 1))),
                Some((i, '[')) => return Some(Ok((i, Token::OpenBracket, i + 1))),
                Some((i, ']')) => return Some(Ok((i, Token::CloseBracket, i + 1))),
                Some((i, '{')) => return Some(Ok((i, Token::OpenBrace, i + 1))),
                Some((i, '}')) => return Some(Ok((i, Token::CloseBrace, i + 1))),
                Some((i, '=')) => {
                    return match self.chars.peek() {
                        Some((_, '>')) => {
                            self.chars.next();
                            Some(Ok((i, Token::Arrow, i + 2)))
                        }
                        _ => Some(Err(LexerError::UnrecognisedToken(
                            i,
                            i + 1,
                            "=".to_string(),
                        ))),
                    }
                }
                Some((_, ch)) if ch.is_whitespace() => (),
                Some((start, _)) => {
                    let mut end;
                    loop {
                        if let Some((i, ch)) = self.chars.next() {
                            end = i;
                            if ch.is_whitespace() {
                                break
                            }
                        } else {
                            end = self.input.len();
                            break
                        }
                    }

                    return Some(Err(LexerError::UnrecognisedToken(
                        start,
                        end,
                        self.input[start..end].to_owned(),
                    )))
                }
                None => return None,
            }
        }
    }
}

impl<'input> Iterator for HumanReadableLexer<'input> {
    type Item = Spanned<Token<'input>, usize, LexerError>;

    /// Return the next token
    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// A parser for single solidity-style declarations: functions, events,
/// errors, constructors, standalone parameters and type strings.
///
/// Type identifiers are resolved against a [`TypeEnv`]: contract-local types
/// first, then the root registry.
pub struct HumanReadableParser<'input> {
    lexer: Peekable<HumanReadableLexer<'input>>,
    env: TypeEnv<'input>,
}

// === impl HumanReadableParser ===

impl<'input> HumanReadableParser<'input> {
    /// Creates a parser over the default root registry.
    pub fn new(input: &'input str) -> Self {
        Self::with_env(input, TypeEnv::root())
    }

    /// Creates a parser resolving identifiers against the given environment.
    pub fn with_env(input: &'input str, env: TypeEnv<'input>) -> Self {
        let lexer = HumanReadableLexer::new(input);
        Self { lexer: lexer.peekable(), env }
    }

    /// Parses a type string like `uint256`, `(bool,bytes32)[2]` or a
    /// registered identifier.
    pub fn parse_type(input: &'input str) -> Result<Type, LexerError> {
        Self::parse_type_with(input, TypeEnv::root())
    }

    /// [`Self::parse_type`] with a custom environment.
    pub fn parse_type_with(input: &'input str, env: TypeEnv<'input>) -> Result<Type, LexerError> {
        let mut parser = Self::with_env(input, env);
        let ty = parser.take_type()?;
        parser.take_eof()?;
        Ok(ty)
    }

    /// Parses a standalone parameter: `type array_suffix* location? indexed?
    /// name?`. Returns the parameter and whether it was marked `indexed`.
    pub fn parse_param(input: &'input str) -> Result<(TupleParam, bool), LexerError> {
        Self::parse_param_with(input, TypeEnv::root())
    }

    /// [`Self::parse_param`] with a custom environment.
    pub fn parse_param_with(
        input: &'input str,
        env: TypeEnv<'input>,
    ) -> Result<(TupleParam, bool), LexerError> {
        let mut parser = Self::with_env(input, env);
        let param = parser.take_param()?;
        parser.take_eof()?;
        Ok(param)
    }

    /// Parses a function declaration, with or without the `function` keyword.
    pub fn parse_function(input: &'input str) -> Result<Function, LexerError> {
        Self::with_env(input, TypeEnv::root()).take_function()
    }

    /// [`Self::parse_function`] with a custom environment.
    pub fn parse_function_with(
        input: &'input str,
        env: TypeEnv<'input>,
    ) -> Result<Function, LexerError> {
        Self::with_env(input, env).take_function()
    }

    /// Parses an event declaration, with or without the `event` keyword.
    pub fn parse_event(input: &'input str) -> Result<Event, LexerError> {
        Self::with_env(input, TypeEnv::root()).take_event()
    }

    /// [`Self::parse_event`] with a custom environment.
    pub fn parse_event_with(input: &'input str, env: TypeEnv<'input>) -> Result<Event, LexerError> {
        Self::with_env(input, env).take_event()
    }

    /// Parses an error declaration, with or without the `error` keyword.
    pub fn parse_error(input: &'input str) -> Result<SolError, LexerError> {
        Self::with_env(input, TypeEnv::root()).take_error()
    }

    /// [`Self::parse_error`] with a custom environment.
    pub fn parse_error_with(
        input: &'input str,
        env: TypeEnv<'input>,
    ) -> Result<SolError, LexerError> {
        Self::with_env(input, env).take_error()
    }

    /// Parses a constructor declaration.
    pub fn parse_constructor(input: &'input str) -> Result<Constructor, LexerError> {
        Self::with_env(input, TypeEnv::root()).take_constructor()
    }

    /// [`Self::parse_constructor`] with a custom environment.
    pub fn parse_constructor_with(
        input: &'input str,
        env: TypeEnv<'input>,
    ) -> Result<Constructor, LexerError> {
        Self::with_env(input, env).take_constructor()
    }

    /// Parses a struct declaration such as `struct Point { uint x; uint y; }`.
    /// Fields referencing other structs stay unresolved; the document parser
    /// substitutes them once every declaration has been seen.
    pub fn parse_struct(input: &'input str) -> Result<SolStruct, LexerError> {
        let mut parser = Self::new(input);
        let parsed = parser.take_struct()?;
        parser.take_eof()?;
        Ok(parsed)
    }

    pub fn take_function(&mut self) -> Result<Function, LexerError> {
        let (l, token, r) = self.next_spanned()?;
        let name = match token {
            Token::Function => {
                let (l, next, r) = self.next_spanned()?;
                match next {
                    Token::Identifier(name) => name.to_string(),
                    t => unrecognised!(l, r, t.to_string()),
                }
            }
            // shorthand declaration without the keyword
            Token::Identifier(name) => name.to_string(),
            t => unrecognised!(l, r, t.to_string()),
        };

        self.take_open_parenthesis()?;
        let inputs = self.take_params()?;
        self.take_close_parenthesis()?;

        let mut state_mutability = StateMutability::NonPayable;
        let mut outputs = Vec::new();

        loop {
            match self.peek() {
                Some(Token::Pure) => {
                    self.next();
                    state_mutability = StateMutability::Pure;
                }
                Some(Token::View) => {
                    self.next();
                    state_mutability = StateMutability::View;
                }
                Some(Token::Payable) => {
                    self.next();
                    state_mutability = StateMutability::Payable;
                }
                Some(Token::Identifier("nonpayable")) => {
                    self.next();
                    state_mutability = StateMutability::NonPayable;
                }
                // visibility and inheritance modifiers are accepted and ignored
                Some(
                    Token::Public |
                    Token::Private |
                    Token::Internal |
                    Token::External |
                    Token::Constant |
                    Token::Virtual |
                    Token::Override,
                ) => {
                    self.next();
                }
                Some(Token::Returns) => {
                    self.next();
                    self.take_open_parenthesis()?;
                    outputs = self.take_params()?;
                    self.take_close_parenthesis()?;
                    break
                }
                // shorthand output list without the `returns` keyword
                Some(Token::OpenParenthesis) => {
                    self.next();
                    outputs = self.take_params()?;
                    self.take_close_parenthesis()?;
                    break
                }
                Some(Token::Semicolon) | None => {
                    self.next();
                    break
                }
                Some(t) => {
                    let (l, _, r) = self.next_spanned()?;
                    unrecognised!(l, r, t.to_string())
                }
            }
        }

        Ok(Function { name, inputs, outputs, state_mutability })
    }

    pub fn take_event(&mut self) -> Result<Event, LexerError> {
        let (l, token, r) = self.next_spanned()?;
        let name = match token {
            Token::Event => {
                let (l, next, r) = self.next_spanned()?;
                match next {
                    Token::Identifier(name) => name.to_string(),
                    t => unrecognised!(l, r, t.to_string()),
                }
            }
            Token::Identifier(name) => name.to_string(),
            t => unrecognised!(l, r, t.to_string()),
        };

        self.take_open_parenthesis()?;
        let inputs = self.take_event_params()?;
        self.take_close_parenthesis()?;
        let anonymous = self.take_anonymous();

        Ok(Event { name, inputs, anonymous })
    }

    pub fn take_error(&mut self) -> Result<SolError, LexerError> {
        let (l, token, r) = self.next_spanned()?;
        let name = match token {
            Token::Error => {
                let (l, next, r) = self.next_spanned()?;
                match next {
                    Token::Identifier(name) => name.to_string(),
                    t => unrecognised!(l, r, t.to_string()),
                }
            }
            Token::Identifier(name) => name.to_string(),
            t => unrecognised!(l, r, t.to_string()),
        };

        self.take_open_parenthesis()?;
        let inputs = self.take_params()?;
        self.take_close_parenthesis()?;

        Ok(SolError { name, inputs })
    }

    pub fn take_constructor(&mut self) -> Result<Constructor, LexerError> {
        self.take_next_exact(Token::Constructor)?;
        self.take_open_parenthesis()?;
        let inputs = self.take_params()?;
        self.take_close_parenthesis()?;

        // modifiers such as `payable` are accepted and ignored
        while let Some(
            Token::Payable | Token::Public | Token::Internal | Token::Semicolon,
        ) = self.peek()
        {
            self.next();
        }

        Ok(Constructor { inputs })
    }

    fn take_anonymous(&mut self) -> bool {
        if self.peek_next(Token::Anonymous) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Parses a comma separated list of parameters up to, but not including, a
    /// closing parenthesis.
    fn take_params(&mut self) -> Result<Vec<TupleParam>, LexerError> {
        let mut params = Vec::new();
        if self.peek_next(Token::CloseParenthesis) {
            return Ok(params)
        }
        loop {
            let (param, _indexed) = self.take_param()?;
            params.push(param);
            if self.peek_next(Token::Comma) {
                self.next();
            } else {
                break
            }
        }
        Ok(params)
    }

    /// Parses all event params
    fn take_event_params(&mut self) -> Result<Vec<EventParam>, LexerError> {
        let mut params = Vec::new();
        if self.peek_next(Token::CloseParenthesis) {
            return Ok(params)
        }
        loop {
            let (param, indexed) = self.take_param()?;
            params.push(EventParam { name: param.name, kind: param.kind, indexed });
            if self.peek_next(Token::Comma) {
                self.next();
            } else {
                break
            }
        }
        Ok(params)
    }

    /// Parses `type array_suffix* data_location? indexed? name?`.
    fn take_param(&mut self) -> Result<(TupleParam, bool), LexerError> {
        let kind = self.take_type()?;
        let mut indexed = false;
        let mut name = String::new();
        loop {
            match self.peek() {
                // data locations carry no ABI information
                Some(Token::Memory | Token::Storage | Token::Calldata) => {
                    self.next();
                }
                Some(Token::Indexed) => {
                    self.next();
                    indexed = true;
                }
                Some(Token::Identifier(id)) => {
                    self.next();
                    name = id.to_string();
                    break
                }
                _ => break,
            }
        }
        Ok((TupleParam { name, kind }, indexed))
    }

    /// Parses a type: an elementary keyword, a tuple literal (optionally
    /// prefixed with `tuple`), or an identifier resolved in the environment.
    /// Array suffixes repeat left to right, the leftmost binding tightest.
    fn take_type(&mut self) -> Result<Type, LexerError> {
        let (l, token, r) = self.next_spanned()?;
        let mut ty = match token {
            Token::Address => {
                // `address payable` in parameter position
                if self.peek_next(Token::Payable) {
                    self.next();
                }
                Type::Address
            }
            Token::Bool => Type::Bool,
            Token::String => Type::String,
            Token::DynamicBytes => Type::Bytes,
            Token::Byte => Type::FixedBytes(1),
            Token::Bytes(len) => Type::FixedBytes(len as usize),
            Token::Uint(size) => Type::Uint(size as usize),
            Token::Int(size) => Type::Int(size as usize),
            Token::Tuple => {
                self.take_open_parenthesis()?;
                let params = self.take_params()?;
                self.take_close_parenthesis()?;
                Type::Tuple(params)
            }
            Token::OpenParenthesis => {
                let params = self.take_params()?;
                self.take_close_parenthesis()?;
                Type::Tuple(params)
            }
            Token::Identifier(name) => {
                let last = self.take_qualified_tail(name)?;
                self.env
                    .lookup(last)
                    .ok_or_else(|| LexerError::UnknownType(l, r, last.to_string()))?
            }
            t => unrecognised!(l, r, t.to_string()),
        };

        ty = wrap_array_suffixes(ty, &self.take_array_suffixes()?);
        Ok(ty)
    }

    /// Consumes the `.segment` tail of a qualified name like
    /// `Contract.Struct`, which resolves by its last segment.
    fn take_qualified_tail(
        &mut self,
        first: &'input str,
    ) -> Result<&'input str, LexerError> {
        let mut last = first;
        while self.peek_next(Token::Point) {
            self.next();
            let (l, next, r) = self.next_spanned()?;
            match next {
                Token::Identifier(id) => last = id,
                t => unrecognised!(l, r, t.to_string()),
            }
        }
        Ok(last)
    }

    /// Parses a run of `[n?]` array suffixes.
    fn take_array_suffixes(&mut self) -> Result<Vec<Option<usize>>, LexerError> {
        let mut suffixes = Vec::new();
        while self.peek_next(Token::OpenBracket) {
            self.next();
            let size = match self.peek() {
                Some(Token::Number(num)) => {
                    let (l, _, r) = self.next_spanned()?;
                    let size: usize = num
                        .parse()
                        .map_err(|_| LexerError::InvalidArraySize(l, r, num.to_string()))?;
                    if size == 0 {
                        return Err(LexerError::InvalidArraySize(l, r, num.to_string()))
                    }
                    Some(size)
                }
                _ => None,
            };
            self.take_next_exact(Token::CloseBracket)?;
            suffixes.push(size);
        }
        Ok(suffixes)
    }

    pub fn take_struct(&mut self) -> Result<SolStruct, LexerError> {
        self.take_next_exact(Token::Struct)?;
        let (l, token, r) = self.next_spanned()?;
        let name = match token {
            Token::Identifier(name) => name.to_string(),
            t => unrecognised!(l, r, t.to_string()),
        };

        self.take_next_exact(Token::OpenBrace)?;
        let mut fields = Vec::new();
        while !self.peek_next(Token::CloseBrace) {
            fields.push(self.take_struct_field()?);
        }
        self.next();

        Ok(SolStruct::new(name, fields))
    }

    /// Parses one struct field, `<type> <name>`, up to its terminator. The
    /// semicolon may be elided on the last field of the body.
    fn take_struct_field(&mut self) -> Result<FieldDeclaration, LexerError> {
        let kind = self.take_field_type()?;

        let (l, token, r) = self.next_spanned()?;
        let name = match token {
            Token::Identifier(name) => name.to_string(),
            t => unrecognised!(l, r, t.to_string()),
        };

        match self.peek() {
            Some(Token::Semicolon) => {
                self.next();
            }
            Some(Token::CloseBrace) => {}
            _ => {
                let (l, token, r) = self.next_spanned()?;
                unrecognised!(l, r, token.to_string())
            }
        }

        Ok(FieldDeclaration::new(name, kind))
    }

    /// The type position of a struct field. Identifiers are kept as
    /// unresolved struct references for the document parser to substitute;
    /// everything else must be a complete type.
    fn take_field_type(&mut self) -> Result<FieldType, LexerError> {
        if self.peek_next(Token::Mapping) {
            return Ok(FieldType::Mapping(Box::new(self.take_mapping()?)))
        }
        match self.peek() {
            Some(Token::Identifier(_)) => {
                let (l, token, r) = self.next_spanned()?;
                match token {
                    Token::Identifier(name) => {
                        let last = self.take_qualified_tail(name)?.to_string();
                        let suffixes = self.take_array_suffixes()?;
                        Ok(FieldType::Struct(StructFieldType::new(last, suffixes)))
                    }
                    t => unrecognised!(l, r, t.to_string()),
                }
            }
            _ => self.take_type().map(FieldType::Elementary),
        }
    }

    /// Parses `mapping(<key> => <value>)`. Keys are restricted to value
    /// types, `bytes` and `string`; values may nest further mappings or
    /// reference structs.
    fn take_mapping(&mut self) -> Result<MappingType, LexerError> {
        self.take_next_exact(Token::Mapping)?;
        self.take_open_parenthesis()?;

        let key_type = self.take_type()?;
        if matches!(
            key_type.resolve(),
            Type::Array(_) | Type::FixedArray(..) | Type::Tuple(_) | Type::EventTuple(_)
        ) {
            return Err(LexerError::IllegalMappingKey(key_type.canonical()))
        }

        self.take_next_exact(Token::Arrow)?;
        let value_type = self.take_field_type()?;
        self.take_close_parenthesis()?;

        Ok(MappingType::new(key_type, value_type))
    }

    fn take_open_parenthesis(&mut self) -> Result<(), LexerError> {
        self.take_next_exact(Token::OpenParenthesis)
    }

    fn take_close_parenthesis(&mut self) -> Result<(), LexerError> {
        self.take_next_exact(Token::CloseParenthesis)
    }

    fn take_next_exact(&mut self, token: Token) -> Result<(), LexerError> {
        let (l, next, r) = self.next_spanned()?;
        if next != token {
            unrecognised!(l, r, next.to_string())
        }
        Ok(())
    }

    fn take_eof(&mut self) -> Result<(), LexerError> {
        match self.next() {
            Some(Ok((l, t, r))) => unrecognised!(l, r, t.to_string()),
            Some(Err(err)) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns true if the next token is the given `token`
    fn peek_next(&mut self, token: Token) -> bool {
        matches!(self.lexer.peek(), Some(Ok(next)) if next.1 == token)
    }

    fn peek(&mut self) -> Option<Token<'input>> {
        match self.lexer.peek() {
            Some(Ok(next)) => Some(next.1),
            _ => None,
        }
    }

    fn next_spanned(&mut self) -> Spanned<Token<'input>, usize, LexerError> {
        self.next().ok_or(LexerError::EndOfFile)?
    }

    #[allow(clippy::should_implement_trait)]
    fn next(&mut self) -> Option<Spanned<Token<'input>, usize, LexerError>> {
        self.lexer.next()
    }
}

fn keyword(id: &str) -> Option<Token> {
    let token = match id {
        "address" => Token::Address,
        "anonymous" => Token::Anonymous,
        "bool" => Token::Bool,
        "bytes1" => Token::Bytes(1),
        "bytes2" => Token::Bytes(2),
        "bytes3" => Token::Bytes(3),
        "bytes4" => Token::Bytes(4),
        "bytes5" => Token::Bytes(5),
        "bytes6" => Token::Bytes(6),
        "bytes7" => Token::Bytes(7),
        "bytes8" => Token::Bytes(8),
        "bytes9" => Token::Bytes(9),
        "bytes10" => Token::Bytes(10),
        "bytes11" => Token::Bytes(11),
        "bytes12" => Token::Bytes(12),
        "bytes13" => Token::Bytes(13),
        "bytes14" => Token::Bytes(14),
        "bytes15" => Token::Bytes(15),
        "bytes16" => Token::Bytes(16),
        "bytes17" => Token::Bytes(17),
        "bytes18" => Token::Bytes(18),
        "bytes19" => Token::Bytes(19),
        "bytes20" => Token::Bytes(20),
        "bytes21" => Token::Bytes(21),
        "bytes22" => Token::Bytes(22),
        "bytes23" => Token::Bytes(23),
        "bytes24" => Token::Bytes(24),
        "bytes25" => Token::Bytes(25),
        "bytes26" => Token::Bytes(26),
        "bytes27" => Token::Bytes(27),
        "bytes28" => Token::Bytes(28),
        "bytes29" => Token::Bytes(29),
        "bytes30" => Token::Bytes(30),
        "bytes31" => Token::Bytes(31),
        "bytes32" => Token::Bytes(32),
        "bytes" => Token::DynamicBytes,
        "byte" => Token::Byte,
        "calldata" => Token::Calldata,
        "constant" => Token::Constant,
        "constructor" => Token::Constructor,
        "enum" => Token::Enum,
        "event" => Token::Event,
        "error" => Token::Error,
        "external" => Token::External,
        "function" => Token::Function,
        "indexed" => Token::Indexed,
        "tuple" => Token::Tuple,
        "int8" => Token::Int(8),
        "int16" => Token::Int(16),
        "int24" => Token::Int(24),
        "int32" => Token::Int(32),
        "int40" => Token::Int(40),
        "int48" => Token::Int(48),
        "int56" => Token::Int(56),
        "int64" => Token::Int(64),
        "int72" => Token::Int(72),
        "int80" => Token::Int(80),
        "int88" => Token::Int(88),
        "int96" => Token::Int(96),
        "int104" => Token::Int(104),
        "int112" => Token::Int(112),
        "int120" => Token::Int(120),
        "int128" => Token::Int(128),
        "int136" => Token::Int(136),
        "int144" => Token::Int(144),
        "int152" => Token::Int(152),
        "int160" => Token::Int(160),
        "int168" => Token::Int(168),
        "int176" => Token::Int(176),
        "int184" => Token::Int(184),
        "int192" => Token::Int(192),
        "int200" => Token::Int(200),
        "int208" => Token::Int(208),
        "int216" => Token::Int(216),
        "int224" => Token::Int(224),
        "int232" => Token::Int(232),
        "int240" => Token::Int(240),
        "int248" => Token::Int(248),
        "int256" => Token::Int(256),
        "internal" => Token::Internal,
        "int" => Token::Int(256),
        "mapping" => Token::Mapping,
        "memory" => Token::Memory,
        "payable" => Token::Payable,
        "private" => Token::Private,
        "public" => Token::Public,
        "pure" => Token::Pure,
        "returns" => Token::Returns,
        "storage" => Token::Storage,
        "string" => Token::String,
        "struct" => Token::Struct,
        "type" => Token::Type,
        "uint8" => Token::Uint(8),
        "uint16" => Token::Uint(16),
        "uint24" => Token::Uint(24),
        "uint32" => Token::Uint(32),
        "uint40" => Token::Uint(40),
        "uint48" => Token::Uint(48),
        "uint56" => Token::Uint(56),
        "uint64" => Token::Uint(64),
        "uint72" => Token::Uint(72),
        "uint80" => Token::Uint(80),
        "uint88" => Token::Uint(88),
        "uint96" => Token::Uint(96),
        "uint104" => Token::Uint(104),
        "uint112" => Token::Uint(112),
        "uint120" => Token::Uint(120),
        "uint128" => Token::Uint(128),
        "uint136" => Token::Uint(136),
        "uint144" => Token::Uint(144),
        "uint152" => Token::Uint(152),
        "uint160" => Token::Uint(160),
        "uint168" => Token::Uint(168),
        "uint176" => Token::Uint(176),
        "uint184" => Token::Uint(184),
        "uint192" => Token::Uint(192),
        "uint200" => Token::Uint(200),
        "uint208" => Token::Uint(208),
        "uint216" => Token::Uint(216),
        "uint224" => Token::Uint(224),
        "uint232" => Token::Uint(232),
        "uint240" => Token::Uint(240),
        "uint248" => Token::Uint(248),
        "uint256" => Token::Uint(256),
        "uint" => Token::Uint(256),
        "view" => Token::View,
        "receive" => Token::Receive,
        "fallback" => Token::Fallback,
        "abstract" => Token::Abstract,
        "virtual" => Token::Virtual,
        "override" => Token::Override,
        _ => return None,
    };
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_elementary_types() {
        assert_eq!(HumanReadableParser::parse_type("uint256").unwrap(), Type::Uint(256));
        assert_eq!(HumanReadableParser::parse_type("uint").unwrap(), Type::Uint(256));
        assert_eq!(HumanReadableParser::parse_type("int").unwrap(), Type::Int(256));
        assert_eq!(HumanReadableParser::parse_type("byte").unwrap(), Type::FixedBytes(1));
        assert_eq!(HumanReadableParser::parse_type("bytes32").unwrap(), Type::FixedBytes(32));
        assert_eq!(HumanReadableParser::parse_type("bool").unwrap(), Type::Bool);
    }

    #[test]
    fn parses_array_suffixes_leftmost_tightest() {
        assert_eq!(
            HumanReadableParser::parse_type("uint256[2][3]").unwrap(),
            Type::fixed_array(Type::fixed_array(Type::Uint(256), 2), 3)
        );
        assert_eq!(
            HumanReadableParser::parse_type("bytes32[]").unwrap(),
            Type::array(Type::FixedBytes(32))
        );
        assert_eq!(
            HumanReadableParser::parse_type("uint8[4][]").unwrap(),
            Type::array(Type::fixed_array(Type::Uint(8), 4))
        );
        assert!(HumanReadableParser::parse_type("uint8[0]").is_err());
    }

    #[test]
    fn parses_tuple_literals() {
        let expected = Type::tuple([("a", Type::Uint(256)), ("b", Type::FixedBytes(32))]);
        assert_eq!(
            HumanReadableParser::parse_type("(uint256 a, bytes32 b)").unwrap(),
            expected
        );
        assert_eq!(
            HumanReadableParser::parse_type("tuple(uint256 a, bytes32 b)").unwrap(),
            expected
        );
        assert_eq!(
            HumanReadableParser::parse_type("(uint256,bytes32)[]").unwrap(),
            Type::array(Type::unnamed_tuple([Type::Uint(256), Type::FixedBytes(32)]))
        );
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        assert!(matches!(
            HumanReadableParser::parse_type("MyStruct"),
            Err(LexerError::UnknownType(..))
        ));
    }

    #[test]
    fn resolves_identifiers_in_env() {
        use crate::abi::registry::TypeRegistry;
        let mut registry = TypeRegistry::new();
        registry.insert(
            "Point",
            Type::alias("Point", Type::unnamed_tuple([Type::Uint(256), Type::Uint(256)])),
        );
        let env = TypeEnv::new(&registry);
        let ty = HumanReadableParser::parse_type_with("Point[2]", env).unwrap();
        assert_eq!(ty.canonical(), "(uint256,uint256)[2]");

        // qualified names resolve by their last segment
        let ty = HumanReadableParser::parse_type_with("Geometry.Point", env).unwrap();
        assert_eq!(ty.canonical(), "(uint256,uint256)");
    }

    #[test]
    fn parses_functions() {
        let f = HumanReadableParser::parse_function(
            "function approve(address _spender, uint256 value) external returns(bool)",
        )
        .unwrap();
        assert_eq!(f.name, "approve");
        assert_eq!(f.inputs[0].name, "_spender");
        assert_eq!(f.inputs[0].kind, Type::Address);
        assert_eq!(f.inputs[1].kind, Type::Uint(256));
        assert_eq!(f.outputs[0].kind, Type::Bool);
    }

    #[test]
    fn parses_function_shorthand() {
        let f =
            HumanReadableParser::parse_function("bar(uint256[] memory x)(address)").unwrap();
        assert_eq!(f.name, "bar");
        assert_eq!(f.inputs[0].kind, Type::array(Type::Uint(256)));
        assert_eq!(f.outputs[0].kind, Type::Address);
    }

    #[test]
    fn parses_state_mutability() {
        let cases = [
            ("function f() pure", StateMutability::Pure),
            ("function f() external view returns (uint256)", StateMutability::View),
            ("function f() public payable", StateMutability::Payable),
            ("function f() nonpayable", StateMutability::NonPayable),
            ("function f()", StateMutability::NonPayable),
        ];
        for (s, expected) in cases {
            assert_eq!(HumanReadableParser::parse_function(s).unwrap().state_mutability, expected);
        }
    }

    #[test]
    fn parses_tuple_parameters() {
        let f = HumanReadableParser::parse_function(
            "function foo(tuple(uint256 a, bytes32 b)[] memory c) pure returns (uint256 d)",
        )
        .unwrap();
        assert_eq!(f.inputs[0].name, "c");
        assert_eq!(f.inputs[0].kind.canonical(), "(uint256,bytes32)[]");
        assert_eq!(f.outputs[0].name, "d");
    }

    #[test]
    fn parses_events() {
        let e = HumanReadableParser::parse_event(
            "event Transfer(address indexed from, address indexed to, uint256 value)",
        )
        .unwrap();
        assert_eq!(e.name, "Transfer");
        assert!(e.inputs[0].indexed);
        assert!(e.inputs[1].indexed);
        assert!(!e.inputs[2].indexed);
        assert!(!e.anonymous);
    }

    #[test]
    fn parses_anonymous_event() {
        let e = HumanReadableParser::parse_event("event Foo() anonymous").unwrap();
        assert!(e.anonymous);
        assert!(e.inputs.is_empty());
    }

    #[test]
    fn parses_unnamed_indexed_event_param() {
        let e = HumanReadableParser::parse_event("event Foo(address indexed)").unwrap();
        assert_eq!(e.inputs[0].name, "");
        assert!(e.inputs[0].indexed);
    }

    #[test]
    fn parses_errors() {
        let e = HumanReadableParser::parse_error(
            "error InsufficientBalance(uint256 available, uint256 required)",
        )
        .unwrap();
        assert_eq!(e.name, "InsufficientBalance");
        assert_eq!(e.inputs.len(), 2);
    }

    #[test]
    fn parses_constructors() {
        let c =
            HumanReadableParser::parse_constructor("constructor(address owner, uint256 cap) payable")
                .unwrap();
        assert_eq!(c.inputs.len(), 2);
        assert_eq!(c.inputs[0].name, "owner");
    }

    #[test]
    fn parses_address_payable_param() {
        let f = HumanReadableParser::parse_function("function f(address payable to)").unwrap();
        assert_eq!(f.inputs[0].kind, Type::Address);
        assert_eq!(f.inputs[0].name, "to");
    }

    #[test]
    fn can_parse_functions() {
        [
            "function foo(uint256[] memory x) external view returns (address)",
            "function bar(uint256[] memory x) returns(address)",
            "function bar(uint256[] memory x, uint32 y) returns (address, uint256)",
            "function foo(address[] memory, bytes memory) returns (bytes memory)",
            "function bar(uint256[] memory x)",
            "function bar()",
            "bar(uint256[] memory x)(address)",
            "bar(uint256[] memory x, uint32 y)(address, uint256)",
            "foo(address[] memory, bytes memory)(bytes memory)",
            "bar(uint256[] memory x)()",
            "bar()()",
            "bar(uint256)",
            "bar()",
        ]
        .iter()
        .for_each(|s| {
            HumanReadableParser::parse_function(s).unwrap();
        });
    }

    #[test]
    fn can_parse_params() {
        [
            "address x",
            "address",
            "bytes memory y",
            "bytes memory",
            "bytes32[] memory",
            "bytes32[] memory z",
            "uint256 indexed t",
        ]
        .iter()
        .for_each(|s| {
            HumanReadableParser::parse_param(s).unwrap();
        });
    }
}
