/// The analyzer module checks a parsed program before it runs.
///
/// The analyzer resolves every variable and function reference against a
/// chain of static scopes, computes the type of each expression and verifies
/// the type rules of every statement. It annotates the syntax tree with what
/// it resolved.
///
/// # Responsibilities
/// - Requires a `main()` method returning `Integer`.
/// - Rejects unknown names, mismatched types and out-of-range literals.
/// - Records static types and resolved bindings on the tree.
pub mod analyzer;
/// The evaluator module executes a program and computes results.
///
/// The evaluator walks the syntax tree, evaluates expressions and statements,
/// manages the runtime scope chain and calls built-in and user-defined
/// methods. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates every expression and statement form.
/// - Handles method calls, closures and control flow.
/// - Reports runtime errors such as division by zero or unknown names.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a list of tokens, each
/// tagged with its kind, its exact text and its byte offset. Keywords are
/// identifiers; the parser recognises them by text.
///
/// # Responsibilities
/// - Converts the input into identifier, number, character, string and
///   operator tokens.
/// - Skips whitespace between tokens.
/// - Reports malformed character and string literals.
pub mod lexer;
/// The parser module builds the syntax tree from tokens.
///
/// The parser is a recursive-descent parser over the token list produced by
/// the lexer. It builds a `Source` holding the program's fields and methods.
///
/// # Responsibilities
/// - Converts tokens into fields, methods, statements and expressions.
/// - Reports the expected construct and the offending offset on failure.
pub mod parser;
/// Lexically nested symbol tables.
///
/// A single generic scope type serves both the analyzer, which stores types,
/// and the evaluator, which stores values.
pub mod scope;
/// Static types, type names and resolved bindings.
pub mod types;
/// The value module defines the runtime data of evaluation.
///
/// This module declares the values a program computes with: nil, booleans,
/// arbitrary-precision integers, decimals, characters, strings, iterables
/// and host-provided objects.
pub mod value;
