//! Builder for Weaviate `Get` GraphQL queries.
//!
//! Only the argument shapes the movie queries need are modelled: `bm25`,
//! `nearText`, `nearObject`, `hybrid`, `where` and `limit`.

use uuid::Uuid;

/// A `where` filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `{path: [..], operator: Equal, valueNumber: n}`
    EqualNumber { path: String, value: f64 },
    /// `{path: [..], operator: Like, valueText: "*x*"}`
    Like { path: String, pattern: String },
    /// `{operator: Or, operands: [..]}`
    Or(Vec<Filter>),
}

impl Filter {
    fn render(&self) -> String {
        match self {
            Filter::EqualNumber { path, value } => format!(
                "{{path: [{}], operator: Equal, valueNumber: {}}}",
                literal(path),
                value
            ),
            Filter::Like { path, pattern } => format!(
                "{{path: [{}], operator: Like, valueText: {}}}",
                literal(path),
                literal(pattern)
            ),
            Filter::Or(operands) => {
                let inner: Vec<String> = operands.iter().map(Filter::render).collect();
                format!("{{operator: Or, operands: [{}]}}", inner.join(", "))
            }
        }
    }
}

/// `Get { <Class>(<arguments>) { <fields> } }`
#[derive(Debug, Clone)]
pub struct GetQuery {
    class_name: String,
    fields: Vec<String>,
    arguments: Vec<String>,
    limit: Option<usize>,
}

impl GetQuery {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            fields: Vec::new(),
            arguments: Vec::new(),
            limit: None,
        }
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// BM25 keyword search. Properties may carry a `^n` boost.
    pub fn bm25(mut self, query: &str, properties: &[&str]) -> Self {
        self.arguments.push(format!(
            "bm25: {{query: {}, properties: [{}]}}",
            literal(query),
            literal_list(properties)
        ));
        self
    }

    pub fn near_text(mut self, concepts: &[&str]) -> Self {
        self.arguments
            .push(format!("nearText: {{concepts: [{}]}}", literal_list(concepts)));
        self
    }

    pub fn near_object(mut self, id: Uuid) -> Self {
        self.arguments
            .push(format!("nearObject: {{id: {}}}", literal(&id.to_string())));
        self
    }

    /// Hybrid search; `alpha` 0 is pure keyword, 1 is pure vector.
    pub fn hybrid(mut self, query: &str, alpha: f32) -> Self {
        self.arguments.push(format!(
            "hybrid: {{query: {}, alpha: {}}}",
            literal(query),
            alpha
        ));
        self
    }

    pub fn where_filter(mut self, filter: Filter) -> Self {
        self.arguments.push(format!("where: {}", filter.render()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Render the full query document.
    pub fn build(&self) -> String {
        let mut arguments = self.arguments.clone();
        if let Some(limit) = self.limit {
            arguments.push(format!("limit: {limit}"));
        }
        let args = if arguments.is_empty() {
            String::new()
        } else {
            format!("({})", arguments.join(", "))
        };
        format!(
            "{{ Get {{ {}{} {{ {} }} }} }}",
            self.class_name,
            args,
            self.fields.join(" ")
        )
    }
}

/// GraphQL string literal. JSON string escaping is a valid subset.
fn literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn literal_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| literal(v))
        .collect::<Vec<_>>()
        .join(", ")
}
