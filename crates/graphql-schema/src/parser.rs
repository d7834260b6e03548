//! Parsing configuration.
//!
//! Lexing and grammar live in the external [`apollo_parser`] crate; this
//! type carries the limits passed through to it and exposes the two entry
//! points that turn source text into this crate's representations. For the
//! default configuration use [`Schema::parse`] or
//! [`ExecutableDocument::parse`].

use crate::executable;
use crate::executable::ExecutableDocument;
use crate::result::Checked;
use crate::result::Problem;
use crate::schema::from_cst;
use crate::schema::Schema;

#[derive(Default, Debug, Clone)]
pub struct Parser {
    recursion_limit: Option<usize>,
    token_limit: Option<usize>,
}

impl Parser {
    /// A parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the recursion limit to use while parsing, protecting
    /// against stack overflow on deeply nested syntax. If unset,
    /// `apollo-parser`'s default limit applies.
    pub fn recursion_limit(mut self, value: usize) -> Self {
        self.recursion_limit = Some(value);
        self
    }

    /// Configure the limit on the number of tokens to parse. Parsing an
    /// oversized document is aborted with a problem. By default there is
    /// no limit.
    pub fn token_limit(mut self, value: usize) -> Self {
        self.token_limit = Some(value);
        self
    }

    /// Parses an SDL document into a validated [`Schema`].
    pub fn parse_schema(&self, source_text: &str) -> Checked<Schema> {
        from_cst::parse_schema(self, source_text)
    }

    /// Parses an executable document; variable types resolve against
    /// `schema`.
    pub fn parse_executable(
        &self,
        schema: &Schema,
        source_text: &str,
    ) -> Checked<ExecutableDocument> {
        let tree = self.apollo(source_text).parse();
        let problems = syntax_problems(&tree);
        if !problems.is_empty() {
            return Checked::Failure(problems);
        }
        Checked::Success(executable::document_from_cst(schema, &tree.document()))
    }

    pub(crate) fn apollo<'a>(&self, source_text: &'a str) -> apollo_parser::Parser<'a> {
        let mut parser = apollo_parser::Parser::new(source_text);
        if let Some(value) = self.recursion_limit {
            parser = parser.recursion_limit(value);
        }
        if let Some(value) = self.token_limit {
            parser = parser.token_limit(value);
        }
        parser
    }
}

pub(crate) fn syntax_problems(tree: &apollo_parser::SyntaxTree) -> Vec<Problem> {
    tree.errors()
        .map(|error| {
            if error.is_limit() {
                Problem::ParserLimit(error.message().to_string())
            } else {
                Problem::Syntax(error.message().to_string())
            }
        })
        .collect()
}
