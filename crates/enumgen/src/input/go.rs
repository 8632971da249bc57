//! Go enum extraction.
//!
//! Walks one Go source file and recovers the constants of a target type,
//! evaluating `iota`, implicit repetition and constant expressions well
//! enough to reproduce the values the Go type checker would assign.

use super::ParseError;
use crate::error::Error;
use crate::ir::{Literal, RawMember, ScannedUnit, UnderlyingType};
use std::collections::HashMap;
use tree_sitter::{Node, Parser, Tree};

/// Scan Go `source` for constants of `target_type`.
///
/// `target_type` may be package qualified (`github.com/acme/day.Day`); only
/// the final identifier is compared.
pub fn scan_go(source: &str, target_type: &str) -> Result<ScannedUnit, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_go::language().into())
        .map_err(|e| ParseError::Unsupported(format!("tree-sitter init: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Unsupported("failed to parse Go".into()))?;

    let target = target_type.rsplit('.').next().unwrap_or(target_type);
    let mut ctx = ScanContext::new(source, target);
    let unit = ctx.scan(&tree)?;

    if unit.members.is_empty() {
        return Err(Error::NoMembersFound {
            enum_name: target.to_string(),
        });
    }
    Ok(unit)
}

/// An evaluated constant and its type, if typed.
#[derive(Debug, Clone)]
struct Typed {
    value: Literal,
    ty: Option<String>,
}

struct ScanContext<'a> {
    source: &'a str,
    target: &'a str,
    /// Declared type name -> type it is defined as.
    types: HashMap<String, String>,
    consts: HashMap<String, Typed>,
}

impl<'a> ScanContext<'a> {
    fn new(source: &'a str, target: &'a str) -> Self {
        Self {
            source,
            target,
            types: HashMap::new(),
            consts: HashMap::new(),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn scan(&mut self, tree: &Tree) -> Result<ScannedUnit, Error> {
        let root = tree.root_node();
        if root.has_error() {
            tracing::warn!("Go source contains syntax errors, scanning what parsed");
        }

        let mut unit = ScannedUnit::default();
        let mut cursor = root.walk();
        let top_level: Vec<Node> = root.named_children(&mut cursor).collect();

        // Types first so constants can refer to types declared further down.
        for node in &top_level {
            match node.kind() {
                "package_clause" => {
                    unit.package = first_named_child(*node, "package_identifier")
                        .map(|n| self.node_text(n).to_string());
                }
                "type_declaration" => self.collect_types(*node),
                _ => {}
            }
        }

        for node in &top_level {
            if node.kind() == "const_declaration" {
                self.scan_const_declaration(*node, &mut unit.members)?;
            }
        }

        Ok(unit)
    }

    fn collect_types(&mut self, decl: Node) {
        let mut cursor = decl.walk();
        for spec in decl.named_children(&mut cursor) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            let (Some(name), Some(ty)) = (
                spec.child_by_field_name("name"),
                spec.child_by_field_name("type"),
            ) else {
                continue;
            };
            self.types
                .insert(self.node_text(name).to_string(), self.node_text(ty).to_string());
        }
    }

    /// Follow `type A B` chains down to a predeclared type.
    fn underlying_of(&self, type_name: &str) -> Option<String> {
        let mut current = unqualified(type_name);
        for _ in 0..16 {
            match self.types.get(current) {
                Some(next) => current = unqualified(next),
                None => break,
            }
        }
        if current == unqualified(type_name) && !self.types.contains_key(current) {
            return None;
        }
        Some(current.to_string())
    }

    fn is_target(&self, ty: Option<&str>) -> bool {
        ty.is_some_and(|t| unqualified(t) == self.target)
    }

    fn scan_const_declaration(
        &mut self,
        decl: Node,
        members: &mut Vec<RawMember>,
    ) -> Result<(), Error> {
        let mut cursor = decl.walk();
        let specs: Vec<Node> = decl
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "const_spec")
            .collect();

        // (type, value list) of the last spec that had a value, for implicit repetition
        let mut previous: Option<(Option<Node>, Node)> = None;

        for (iota, spec) in specs.into_iter().enumerate() {
            let (ty_node, values_node) = match spec.child_by_field_name("value") {
                Some(values) => (spec.child_by_field_name("type"), values),
                None => match previous {
                    Some(prev) => prev,
                    None => {
                        return Err(ParseError::Unsupported(format!(
                            "constant without value: {}",
                            self.node_text(spec)
                        ))
                        .into());
                    }
                },
            };
            previous = Some((ty_node, values_node));

            let declared = ty_node.map(|n| self.node_text(n).to_string());
            let mut values_cursor = values_node.walk();
            let values: Vec<Node> = values_node
                .named_children(&mut values_cursor)
                .filter(|n| n.kind() != "comment")
                .collect();

            let mut names_cursor = spec.walk();
            let names: Vec<Node> = spec
                .children_by_field_name("name", &mut names_cursor)
                .collect();

            for (i, name_node) in names.into_iter().enumerate() {
                let name = self.node_text(name_node);
                if name == "_" {
                    continue;
                }

                let evaluated = match values.get(i) {
                    Some(expr) => self.eval(*expr, iota as i128),
                    None => Err(ParseError::Unsupported(format!("missing value for {}", name))),
                };

                let typed = match evaluated.and_then(|mut typed| {
                    if declared.is_some() {
                        typed.ty = declared.clone();
                    }
                    self.representable(typed)
                }) {
                    Ok(typed) => typed,
                    Err(e) if self.is_target(declared.as_deref()) => return Err(e.into()),
                    Err(e) => {
                        tracing::debug!(constant = name, error = %e, "skipping constant");
                        continue;
                    }
                };

                if self.is_target(typed.ty.as_deref()) {
                    let type_name = typed.ty.clone().unwrap_or_default();
                    let underlying = match self.underlying_of(&type_name) {
                        Some(underlying) => UnderlyingType::new(underlying),
                        None => {
                            let implied = typed.value.implied_type();
                            tracing::warn!(
                                type_name = %type_name,
                                inferred = %implied,
                                "type declaration not found, inferring underlying type"
                            );
                            implied
                        }
                    };
                    tracing::debug!(constant = name, value = %typed.value, "matched enum constant");
                    members.push(RawMember {
                        symbol: name.to_string(),
                        literal: typed.value.clone(),
                        comment: self.trailing_comment(spec).map(str::to_string),
                        type_name,
                        underlying,
                    });
                }

                self.consts.insert(name.to_string(), typed);
            }
        }

        Ok(())
    }

    /// The comment on the same line as the end of `spec`, if any.
    fn trailing_comment(&self, spec: Node) -> Option<&'a str> {
        let row = spec.end_position().row;

        // tree-sitter may attach the comment inside the spec's value list
        if let Some(comment) = last_comment_within(spec)
            && comment.start_position().row == row
        {
            return Some(self.node_text(comment));
        }

        let mut current = spec;
        loop {
            if let Some(next) = current.next_named_sibling() {
                if next.kind() == "comment" && next.start_position().row == row {
                    return Some(self.node_text(next));
                }
                return None;
            }
            // `const X Day = 1 // ...` puts the comment after the declaration
            let parent = current.parent()?;
            if parent.kind() != "const_declaration" || parent.end_position().row != row {
                return None;
            }
            current = parent;
        }
    }

    /// Integer range of `type_name`, if it resolves to a sized integer type.
    fn int_bounds(&self, type_name: &str) -> Option<(i128, i128)> {
        let underlying = self.underlying_of(type_name)?;
        let bounds = match underlying.as_str() {
            "int8" => (i8::MIN as i128, i8::MAX as i128),
            "int16" => (i16::MIN as i128, i16::MAX as i128),
            "int32" | "rune" => (i32::MIN as i128, i32::MAX as i128),
            "int" | "int64" => (i64::MIN as i128, i64::MAX as i128),
            "uint8" | "byte" => (0, u8::MAX as i128),
            "uint16" => (0, u16::MAX as i128),
            "uint32" => (0, u32::MAX as i128),
            "uint" | "uint64" | "uintptr" => (0, u64::MAX as i128),
            _ => return None,
        };
        Some(bounds)
    }

    /// Typed integer constants must fit their type.
    fn representable(&self, typed: Typed) -> Result<Typed, ParseError> {
        if let (Literal::Int(value), Some(ty)) = (&typed.value, &typed.ty)
            && let Some((min, max)) = self.int_bounds(ty)
            && !(min..=max).contains(value)
        {
            return Err(ParseError::ConstantOverflow {
                value: *value,
                type_name: ty.clone(),
            });
        }
        Ok(typed)
    }

    fn eval(&self, node: Node, iota: i128) -> Result<Typed, ParseError> {
        let untyped = |value: Literal| Typed { value, ty: None };

        match node.kind() {
            "int_literal" => parse_int(self.node_text(node)).map(|v| untyped(Literal::Int(v))),
            "rune_literal" => parse_rune(self.node_text(node)).map(|v| untyped(Literal::Int(v))),
            "interpreted_string_literal" => {
                unescape(self.node_text(node)).map(|s| untyped(Literal::Str(s)))
            }
            "raw_string_literal" => {
                let text = self.node_text(node);
                Ok(untyped(Literal::Str(text.trim_matches('`').to_string())))
            }
            "iota" => Ok(untyped(Literal::Int(iota))),
            "identifier" => {
                let name = self.node_text(node);
                if name == "iota" {
                    return Ok(untyped(Literal::Int(iota)));
                }
                self.consts
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ParseError::Unsupported(format!("unresolved constant {}", name)))
            }
            "parenthesized_expression" => {
                let inner = node
                    .named_child(0)
                    .ok_or_else(|| ParseError::Unsupported("empty parentheses".into()))?;
                self.eval(inner, iota)
            }
            "unary_expression" => self.eval_unary(node, iota),
            "binary_expression" => self.eval_binary(node, iota),
            "call_expression" => self.eval_conversion(node, iota),
            other => Err(ParseError::Unsupported(format!(
                "constant expression {} ({})",
                self.node_text(node),
                other
            ))),
        }
    }

    fn eval_unary(&self, node: Node, iota: i128) -> Result<Typed, ParseError> {
        let operator = node
            .child_by_field_name("operator")
            .map(|n| self.node_text(n))
            .unwrap_or("");
        let operand = node
            .child_by_field_name("operand")
            .ok_or_else(|| ParseError::Unsupported("unary expression without operand".into()))?;
        let mut typed = self.eval(operand, iota)?;

        let Literal::Int(v) = typed.value else {
            return Err(ParseError::Unsupported(format!(
                "operator {} on string constant",
                operator
            )));
        };
        let unsigned_max = typed
            .ty
            .as_deref()
            .and_then(|ty| self.int_bounds(ty))
            .filter(|(min, _)| *min == 0)
            .map(|(_, max)| max);
        typed.value = Literal::Int(match (operator, unsigned_max) {
            ("-", _) => v
                .checked_neg()
                .ok_or_else(|| ParseError::Unsupported(format!("constant overflow: -{}", v)))?,
            ("+", _) => v,
            ("^", Some(max)) => v ^ max,
            ("^", None) => !v,
            (other, _) => {
                return Err(ParseError::Unsupported(format!("unary operator {}", other)));
            }
        });
        self.representable(typed)
    }

    fn eval_binary(&self, node: Node, iota: i128) -> Result<Typed, ParseError> {
        let (Some(left), Some(right), Some(op)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
            node.child_by_field_name("operator"),
        ) else {
            return Err(ParseError::Unsupported("incomplete binary expression".into()));
        };
        let operator = self.node_text(op);
        let left = self.eval(left, iota)?;
        let right = self.eval(right, iota)?;
        let ty = if matches!(operator, "<<" | ">>") {
            left.ty.clone()
        } else {
            left.ty.clone().or_else(|| right.ty.clone())
        };

        let value = match (&left.value, &right.value) {
            (Literal::Int(a), Literal::Int(b)) => Literal::Int(int_op(*a, operator, *b)?),
            (Literal::Str(a), Literal::Str(b)) if operator == "+" => {
                Literal::Str(format!("{}{}", a, b))
            }
            _ => {
                return Err(ParseError::Unsupported(format!(
                    "operator {} on mixed constants",
                    operator
                )));
            }
        };
        self.representable(Typed { value, ty })
    }

    /// `T(expr)`: a conversion gives the constant type `T`.
    fn eval_conversion(&self, node: Node, iota: i128) -> Result<Typed, ParseError> {
        let function = node
            .child_by_field_name("function")
            .ok_or_else(|| ParseError::Unsupported("call without function".into()))?;
        let arguments = node
            .child_by_field_name("arguments")
            .ok_or_else(|| ParseError::Unsupported("call without arguments".into()))?;
        let mut cursor = arguments.walk();
        let args: Vec<Node> = arguments.named_children(&mut cursor).collect();
        let [arg] = args.as_slice() else {
            return Err(ParseError::Unsupported(format!(
                "call in constant: {}",
                self.node_text(node)
            )));
        };

        let mut typed = self.eval(*arg, iota)?;
        typed.ty = Some(self.node_text(function).to_string());
        self.representable(typed)
    }
}

fn unqualified(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

fn first_named_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|n| n.kind() == kind)
}

fn last_comment_within(node: Node) -> Option<Node> {
    let count = node.named_child_count() as u32;
    let last = node.named_child(count.checked_sub(1)?)?;
    if last.kind() == "comment" {
        Some(last)
    } else {
        last_comment_within(last)
    }
}

fn int_op(a: i128, operator: &str, b: i128) -> Result<i128, ParseError> {
    let overflow = || ParseError::Unsupported(format!("constant overflow: {} {} {}", a, operator, b));
    let shift = || u32::try_from(b).map_err(|_| overflow());

    match operator {
        "+" => a.checked_add(b).ok_or_else(overflow),
        "-" => a.checked_sub(b).ok_or_else(overflow),
        "*" => a.checked_mul(b).ok_or_else(overflow),
        "/" => a.checked_div(b).ok_or_else(overflow),
        "%" => a.checked_rem(b).ok_or_else(overflow),
        "<<" => {
            let by = shift()?;
            if by >= 127 || a.unsigned_abs().leading_zeros() <= by {
                return Err(overflow());
            }
            Ok(a << by)
        }
        ">>" => {
            let by = shift()?;
            Ok(if by >= 128 { a >> 127 } else { a >> by })
        }
        "&" => Ok(a & b),
        "|" => Ok(a | b),
        "^" => Ok(a ^ b),
        "&^" => Ok(a & !b),
        other => Err(ParseError::Unsupported(format!("binary operator {}", other))),
    }
}

fn parse_int(text: &str) -> Result<i128, ParseError> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        i128::from_str_radix(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i128::from_str_radix(bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i128::from_str_radix(oct, 8)
    } else if lower.len() > 1 && lower.starts_with('0') {
        i128::from_str_radix(&lower[1..], 8)
    } else {
        lower.parse()
    };
    parsed.map_err(|_| ParseError::Unsupported(format!("integer literal {}", text)))
}

fn parse_rune(text: &str) -> Result<i128, ParseError> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(text);
    let value = unescape_str(inner)?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as i128),
        _ => Err(ParseError::Unsupported(format!("rune literal {}", text))),
    }
}

fn unescape(text: &str) -> Result<String, ParseError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    unescape_str(inner)
}

fn unescape_str(inner: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('a') => '\u{07}',
            Some('b') => '\u{08}',
            Some('f') => '\u{0c}',
            Some('v') => '\u{0b}',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            other => {
                return Err(ParseError::Unsupported(format!(
                    "escape sequence \\{}",
                    other.map(String::from).unwrap_or_default()
                )));
            }
        };
        out.push(escaped);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: &str = r#"
package day

type Day int

const (
	Unknown Day = 0 //enum:invalid,default
	Monday  Day = 1 << iota
	Tuesday
	Wednesday
	Thursday
	Friday
)
const (
	Saturday = Friday<<iota + 1
	Sunday
)
"#;

    fn values(unit: &ScannedUnit) -> Vec<(&str, String)> {
        unit.members
            .iter()
            .map(|m| (m.symbol.as_str(), m.literal.to_string()))
            .collect()
    }

    #[test]
    fn iota_and_implicit_repetition() {
        let unit = scan_go(DAY, "Day").unwrap();
        assert_eq!(unit.package.as_deref(), Some("day"));
        assert_eq!(
            values(&unit),
            vec![
                ("Unknown", "0".to_string()),
                ("Monday", "2".to_string()),
                ("Tuesday", "4".to_string()),
                ("Wednesday", "8".to_string()),
                ("Thursday", "16".to_string()),
                ("Friday", "32".to_string()),
                ("Saturday", "33".to_string()),
                ("Sunday", "65".to_string()),
            ]
        );
        assert!(unit.members.iter().all(|m| m.underlying.name == "int"));
    }

    #[test]
    fn trailing_directive_comment() {
        let unit = scan_go(DAY, "Day").unwrap();
        assert_eq!(
            unit.members[0].comment.as_deref(),
            Some("//enum:invalid,default")
        );
        assert!(unit.members[1].comment.is_none());
    }

    #[test]
    fn qualified_target() {
        let unit = scan_go(DAY, "github.com/acme/examples/day.Day").unwrap();
        assert_eq!(unit.members.len(), 8);
    }

    #[test]
    fn string_enum_in_mixed_file() {
        let source = r#"
package directions

type Direction int

const (
	North Direction = iota
	South
	West
	East
)

type Cardinal string

const (
	CardUnkown Cardinal = "unknown" //enum:default,invalid
	CardNorth  Cardinal = "north"
	CardSouth  Cardinal = "south"
)

var fallback Cardinal = "west"
"#;
        let unit = scan_go(source, "Cardinal").unwrap();
        assert_eq!(
            values(&unit),
            vec![
                ("CardUnkown", "\"unknown\"".to_string()),
                ("CardNorth", "\"north\"".to_string()),
                ("CardSouth", "\"south\"".to_string()),
            ]
        );
        assert_eq!(unit.members[0].underlying.name, "string");

        let directions = scan_go(source, "Direction").unwrap();
        assert_eq!(directions.members.len(), 4);
        assert_eq!(directions.members[3].literal, Literal::Int(3));
    }

    #[test]
    fn single_line_declaration_and_conversion() {
        let source = r#"
package level

type Level uint8

const Low = Level(1) //enum:default
const High Level = 0x10
const untyped = 3
"#;
        let unit = scan_go(source, "Level").unwrap();
        assert_eq!(
            values(&unit),
            vec![("Low", "1".to_string()), ("High", "16".to_string())]
        );
        assert_eq!(unit.members[0].comment.as_deref(), Some("//enum:default"));
        assert_eq!(unit.members[0].underlying.name, "uint8");
    }

    #[test]
    fn undeclared_type_is_inferred_from_literal() {
        let source = r#"
package remote

const (
	A other.Kind = "a"
	B other.Kind = "b"
)
"#;
        let unit = scan_go(source, "Kind").unwrap();
        assert_eq!(unit.members[0].underlying.name, "string");
    }

    #[test]
    fn no_members() {
        let err = scan_go(DAY, "Month").unwrap_err();
        assert!(matches!(err, Error::NoMembersFound { ref enum_name } if enum_name == "Month"));
    }

    #[test]
    fn int_literals() {
        assert_eq!(parse_int("1_000").unwrap(), 1000);
        assert_eq!(parse_int("0x1F").unwrap(), 31);
        assert_eq!(parse_int("0b101").unwrap(), 5);
        assert_eq!(parse_int("0o17").unwrap(), 15);
        assert_eq!(parse_int("017").unwrap(), 15);
        assert_eq!(parse_int("0").unwrap(), 0);
        assert_eq!(parse_rune("'a'").unwrap(), 97);
        assert_eq!(parse_rune(r"'\n'").unwrap(), 10);
    }

    #[test]
    fn operators() {
        assert_eq!(int_op(1, "<<", 3).unwrap(), 8);
        assert_eq!(int_op(0b1111, "&^", 0b0101).unwrap(), 0b1010);
        assert!(int_op(1, "/", 0).is_err());
        assert!(int_op(1, "<<", 200).is_err());
        assert_eq!(int_op(-5, ">>", 300).unwrap(), -1);
        assert_eq!(int_op(5, ">>", 128).unwrap(), 0);
        assert!(int_op(5, ">>", -1).is_err());
    }

    const LEVEL: &str = r#"
package level

type Level uint8

const (
	Low Level = 1
	Max Level = ^Level(0)
)
"#;

    #[test]
    fn complement_of_unsigned_constant() {
        let unit = scan_go(LEVEL, "Level").unwrap();
        assert_eq!(
            values(&unit),
            vec![("Low", "1".to_string()), ("Max", "255".to_string())]
        );

        let signed = LEVEL.replace("uint8", "int8");
        let unit = scan_go(&signed, "Level").unwrap();
        assert_eq!(unit.members[1].literal, Literal::Int(-1));
    }

    #[test]
    fn typed_constant_out_of_range() {
        let source = LEVEL.replace("^Level(0)", "Level(1) << 8");
        let err = scan_go(&source, "Level").unwrap_err();
        assert_eq!(
            err.to_string(),
            "constant 256 overflows Level"
        );

        let source = LEVEL.replace("^Level(0)", "-1");
        assert!(matches!(
            scan_go(&source, "Level").unwrap_err(),
            Error::Parse(ParseError::ConstantOverflow { value: -1, .. })
        ));
    }

    #[test]
    fn complement_collides_with_literal() {
        let source = LEVEL.replace("Low Level = 1", "All Level = 255");
        let unit = scan_go(&source, "Level").unwrap();
        let err = crate::EnumDefinition::build(
            "Level",
            unit.members,
            &crate::NamingPolicy::new("Level", "snake"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateRawValue { .. }), "{}", err);
    }

    #[test]
    fn negation_overflow_is_an_error() {
        let source = r#"
package big

type Big int

const Min Big = -(-(1<<126) - (1<<126))
"#;
        assert!(scan_go(source, "Big").is_err());
    }
}
