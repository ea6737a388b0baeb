//! Query persistence.
//!
//! Two formats are supported. [`QueryFormat::Marabou`] is the line-oriented
//! text layout the Marabou binary reads with `--input-query`:
//!
//! ```text
//! <num variables>
//! <num lower bounds>
//! <num upper bounds>
//! <num equations>
//! <num constraints>
//! <num inputs>      followed by one `index,var` line per input
//! <num outputs>     followed by one `index,var` line per output
//! var,value         one line per lower bound
//! var,value         one line per upper bound
//! id,type,scalar,var,coeff,var,coeff,...
//! id,relu,f,b | id,sigmoid,f,b | id,absoluteValue,f,b | id,sign,f,b
//! id,max,f,e1,e2,...
//! id,disj,<n>,<m>,type,scalar,<k>,var,coeff,...,<m>,...
//! ```
//!
//! [`QueryFormat::Json`] is the serde representation of [`InputQuery`].

use super::{InputQuery, QueryError};
use crate::constraint::{
    AbsConstraint, Disjunction, MaxConstraint, PiecewiseConstraint, ReluConstraint,
    SignConstraint, SigmoidConstraint,
};
use nnquery_expr::{Equation, EquationType, VariableId};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryFormat {
    #[default]
    Marabou,
    Json,
}

impl QueryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryFormat::Marabou => "marabou",
            QueryFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for QueryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl InputQuery {
    /// Render the query in the Marabou text format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.num_variables)?;
        writeln!(out, "{}", self.lower_bounds.len())?;
        writeln!(out, "{}", self.upper_bounds.len())?;
        writeln!(out, "{}", self.equations.len())?;
        writeln!(out, "{}", self.constraints.len())?;

        writeln!(out, "{}", self.input_variables.len())?;
        for (index, var) in &self.input_variables {
            writeln!(out, "{},{}", index, var.inner())?;
        }
        writeln!(out, "{}", self.output_variables.len())?;
        for (index, var) in &self.output_variables {
            writeln!(out, "{},{}", index, var.inner())?;
        }

        for (var, value) in &self.lower_bounds {
            writeln!(out, "{},{}", var.inner(), value)?;
        }
        for (var, value) in &self.upper_bounds {
            writeln!(out, "{},{}", var.inner(), value)?;
        }

        for (index, equation) in self.equations.iter().enumerate() {
            write!(
                out,
                "{},{},{}",
                index,
                equation.equation_type().code(),
                equation.scalar()
            )?;
            for (coeff, var) in equation.addends() {
                write!(out, ",{},{}", var.inner(), coeff)?;
            }
            writeln!(out)?;
        }

        for (index, constraint) in self.constraints.iter().enumerate() {
            write!(out, "{index},")?;
            match constraint {
                PiecewiseConstraint::Relu(c) => {
                    writeln!(out, "relu,{},{}", c.output.inner(), c.input.inner())?
                }
                PiecewiseConstraint::Sigmoid(c) => {
                    writeln!(out, "sigmoid,{},{}", c.output.inner(), c.input.inner())?
                }
                PiecewiseConstraint::Abs(c) => {
                    writeln!(out, "absoluteValue,{},{}", c.output.inner(), c.input.inner())?
                }
                PiecewiseConstraint::Sign(c) => {
                    writeln!(out, "sign,{},{}", c.output.inner(), c.input.inner())?
                }
                PiecewiseConstraint::Max(c) => {
                    write!(out, "max,{}", c.output.inner())?;
                    for input in &c.inputs {
                        write!(out, ",{}", input.inner())?;
                    }
                    writeln!(out)?;
                }
                PiecewiseConstraint::Disjunction(d) => {
                    write!(out, "disj,{}", d.len())?;
                    for disjunct in d.disjuncts() {
                        write!(out, ",{}", disjunct.len())?;
                        for equation in disjunct {
                            write!(
                                out,
                                ",{},{},{}",
                                equation.equation_type().code(),
                                equation.scalar(),
                                equation.addends().len()
                            )?;
                            for (coeff, var) in equation.addends() {
                                write!(out, ",{},{}", var.inner(), coeff)?;
                            }
                        }
                    }
                    writeln!(out)?;
                }
            }
        }
        Ok(())
    }

    /// Parse a query from the Marabou text format.
    pub fn from_text(text: &str) -> Result<Self, QueryError> {
        let mut lines = Lines::new(text);

        let num_variables: usize = lines.header("variable count")?;
        let num_lower: usize = lines.header("lower bound count")?;
        let num_upper: usize = lines.header("upper bound count")?;
        let num_equations: usize = lines.header("equation count")?;
        let num_constraints: usize = lines.header("constraint count")?;

        let mut query = InputQuery::new();
        query.set_number_of_variables(num_variables);

        let num_inputs: usize = lines.header("input count")?;
        for _ in 0..num_inputs {
            let (line, mut fields) = lines.fields()?;
            let index = fields.next_value(line, "input index")?;
            let var = fields.next_variable(line)?;
            query
                .mark_input_variable(var, index)
                .map_err(|e| QueryError::parse(line, e.to_string()))?;
        }
        let num_outputs: usize = lines.header("output count")?;
        for _ in 0..num_outputs {
            let (line, mut fields) = lines.fields()?;
            let index = fields.next_value(line, "output index")?;
            let var = fields.next_variable(line)?;
            query
                .mark_output_variable(var, index)
                .map_err(|e| QueryError::parse(line, e.to_string()))?;
        }

        for _ in 0..num_lower {
            let (line, mut fields) = lines.fields()?;
            let var = fields.next_variable(line)?;
            let value = fields.next_value(line, "bound")?;
            query
                .set_lower_bound(var, value)
                .map_err(|e| QueryError::parse(line, e.to_string()))?;
        }
        for _ in 0..num_upper {
            let (line, mut fields) = lines.fields()?;
            let var = fields.next_variable(line)?;
            let value = fields.next_value(line, "bound")?;
            query
                .set_upper_bound(var, value)
                .map_err(|e| QueryError::parse(line, e.to_string()))?;
        }

        for _ in 0..num_equations {
            let (line, mut fields) = lines.fields()?;
            let _index: usize = fields.next_value(line, "equation index")?;
            let mut equation = Equation::new(fields.next_equation_type(line)?);
            equation.set_scalar(fields.next_value(line, "scalar")?);
            while !fields.is_done() {
                let var = fields.next_variable(line)?;
                let coeff = fields.next_value(line, "coefficient")?;
                equation.add_addend(coeff, var);
            }
            query
                .add_equation(equation)
                .map_err(|e| QueryError::parse(line, e.to_string()))?;
        }

        for _ in 0..num_constraints {
            let (line, mut fields) = lines.fields()?;
            let constraint = parse_constraint(line, &mut fields)?;
            fields.finish(line)?;
            query
                .add_constraint(constraint)
                .map_err(|e| QueryError::parse(line, e.to_string()))?;
        }

        if let Some((line, _)) = lines.next_non_empty() {
            return Err(QueryError::parse(line, "unexpected trailing content"));
        }
        Ok(query)
    }

    /// Write the query to `path` in the given format.
    pub fn save(&self, path: &Path, format: QueryFormat) -> Result<(), QueryError> {
        let contents = match format {
            QueryFormat::Marabou => self.to_text(),
            QueryFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| QueryError::Io(format!("Failed to serialize query: {e}")))?,
        };
        std::fs::write(path, contents).map_err(|e| {
            QueryError::Io(format!("Failed to write query to {}: {e}", path.display()))
        })?;
        tracing::debug!(
            component = "query",
            operation = "save",
            status = "success",
            format = format.as_str(),
            path = %path.display(),
            num_variables = self.num_variables,
            num_equations = self.equations.len(),
            num_constraints = self.constraints.len(),
            "Saved input query"
        );
        Ok(())
    }

    /// Read a query previously written with [`InputQuery::save`].
    pub fn load(path: &Path, format: QueryFormat) -> Result<Self, QueryError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            QueryError::Io(format!("Failed to read query from {}: {e}", path.display()))
        })?;
        let query = match format {
            QueryFormat::Marabou => Self::from_text(&contents)?,
            QueryFormat::Json => {
                let query: InputQuery = serde_json::from_str(&contents)
                    .map_err(|e| QueryError::parse(e.line(), e.to_string()))?;
                query.validate()?;
                query
            }
        };
        tracing::debug!(
            component = "query",
            operation = "load",
            status = "success",
            format = format.as_str(),
            path = %path.display(),
            num_variables = query.num_variables,
            "Loaded input query"
        );
        Ok(query)
    }
}

fn parse_constraint(line: usize, fields: &mut Fields<'_>) -> Result<PiecewiseConstraint, QueryError> {
    let _index: usize = fields.next_value(line, "constraint index")?;
    let kind = fields.next_str(line, "constraint kind")?;
    let constraint = match kind {
        "relu" | "sigmoid" | "absoluteValue" | "sign" => {
            let output = fields.next_variable(line)?;
            let input = fields.next_variable(line)?;
            match kind {
                "relu" => PiecewiseConstraint::Relu(ReluConstraint { input, output }),
                "sigmoid" => PiecewiseConstraint::Sigmoid(SigmoidConstraint { input, output }),
                "absoluteValue" => PiecewiseConstraint::Abs(AbsConstraint { input, output }),
                _ => PiecewiseConstraint::Sign(SignConstraint { input, output }),
            }
        }
        "max" => {
            let output = fields.next_variable(line)?;
            let mut inputs = std::collections::BTreeSet::new();
            while !fields.is_done() {
                inputs.insert(fields.next_variable(line)?);
            }
            PiecewiseConstraint::Max(MaxConstraint { inputs, output })
        }
        "disj" => {
            let num_disjuncts: usize = fields.next_value(line, "disjunct count")?;
            let mut disjuncts = Vec::new();
            for _ in 0..num_disjuncts {
                let num_equations: usize = fields.next_value(line, "disjunct equation count")?;
                let mut disjunct = Vec::new();
                for _ in 0..num_equations {
                    let mut equation = Equation::new(fields.next_equation_type(line)?);
                    equation.set_scalar(fields.next_value(line, "scalar")?);
                    let num_addends: usize = fields.next_value(line, "addend count")?;
                    for _ in 0..num_addends {
                        let var = fields.next_variable(line)?;
                        let coeff = fields.next_value(line, "coefficient")?;
                        equation.add_addend(coeff, var);
                    }
                    disjunct.push(equation);
                }
                disjuncts.push(disjunct);
            }
            PiecewiseConstraint::Disjunction(Disjunction::new(disjuncts))
        }
        other => {
            return Err(QueryError::parse(
                line,
                format!("unknown constraint kind '{other}'"),
            ));
        }
    };
    Ok(constraint)
}

// ── Line reader ─────────────────────────────────────────

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_non_empty(&mut self) -> Option<(usize, &'a str)> {
        for (index, raw) in self.inner.by_ref() {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.last_line = index + 1;
                return Some((index + 1, trimmed));
            }
        }
        None
    }

    fn next_line(&mut self) -> Result<(usize, &'a str), QueryError> {
        self.next_non_empty()
            .ok_or_else(|| QueryError::parse(self.last_line + 1, "unexpected end of file"))
    }

    fn header<T: FromStr>(&mut self, what: &str) -> Result<T, QueryError> {
        let (line, text) = self.next_line()?;
        text.parse()
            .map_err(|_| QueryError::parse(line, format!("invalid {what} '{text}'")))
    }

    fn fields(&mut self) -> Result<(usize, Fields<'a>), QueryError> {
        let (line, text) = self.next_line()?;
        Ok((line, Fields(text.split(',').peekable())))
    }
}

struct Fields<'a>(std::iter::Peekable<std::str::Split<'a, char>>);

impl<'a> Fields<'a> {
    fn is_done(&mut self) -> bool {
        self.0.peek().is_none()
    }

    fn next_str(&mut self, line: usize, what: &str) -> Result<&'a str, QueryError> {
        self.0
            .next()
            .map(str::trim)
            .ok_or_else(|| QueryError::parse(line, format!("missing {what}")))
    }

    fn next_value<T: FromStr>(&mut self, line: usize, what: &str) -> Result<T, QueryError> {
        let field = self.next_str(line, what)?;
        field
            .parse()
            .map_err(|_| QueryError::parse(line, format!("invalid {what} '{field}'")))
    }

    fn next_variable(&mut self, line: usize) -> Result<VariableId, QueryError> {
        self.next_value(line, "variable").map(VariableId::new)
    }

    fn next_equation_type(&mut self, line: usize) -> Result<EquationType, QueryError> {
        let code: u8 = self.next_value(line, "equation type")?;
        EquationType::from_code(code)
            .ok_or_else(|| QueryError::parse(line, format!("unknown equation type {code}")))
    }

    fn finish(&mut self, line: usize) -> Result<(), QueryError> {
        match self.0.next() {
            None => Ok(()),
            Some(extra) => Err(QueryError::parse(line, format!("unexpected field '{extra}'"))),
        }
    }
}
