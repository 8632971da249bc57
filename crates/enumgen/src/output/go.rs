//! Go adapter renderer.
//!
//! Emits one Go source file per runtime format, next to the enum declaration,
//! plus the GraphQL `enum` declaration for [`Format::SchemaText`].

use crate::generate::{Format, FormatDescriptor, MemberDescriptor};
use crate::traits::{RenderContext, Renderer};

/// Static instance of the Go renderer for registry.
pub static GO_RENDERER: GoRenderer = GoRenderer;

const HEADER: &str = "// Code generated by enumgen, DO NOT EDIT.\n";

/// Go renderer implementing the Renderer trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoRenderer;

impl Renderer for GoRenderer {
    fn name(&self) -> &'static str {
        "go"
    }

    fn language(&self) -> &'static str {
        "go"
    }

    fn supports(&self, _format: Format) -> bool {
        true
    }

    fn file_suffix(&self, format: Format) -> String {
        match format {
            Format::StringOf => "_enum.go".to_string(),
            Format::SchemaText => "_enum.graphql".to_string(),
            other => format!("_enum_marshal_{}.go", file_tag(other)),
        }
    }

    fn render(&self, descriptor: &FormatDescriptor, ctx: &RenderContext) -> String {
        let names = Names::new(&descriptor.enum_name);
        match descriptor.format {
            Format::SchemaText => render_schema(descriptor),
            Format::StringOf => render_enum(descriptor, &ctx.package, &names),
            Format::Json => render_json(&ctx.package, &names),
            Format::DocumentStore => render_bson(&ctx.package, &names),
            Format::Xml => render_xml(&ctx.package, &names),
            Format::SqlBinding => render_sql(&ctx.package, &names),
            Format::SchemaBinding => render_gql(&ctx.package, &names),
            Format::TextMarshal => render_text(&ctx.package, &names),
            Format::EntValues => render_ent(&ctx.package, &names),
        }
    }
}

fn file_tag(format: Format) -> &'static str {
    match format {
        Format::Json => "json",
        Format::DocumentStore => "bson",
        Format::Xml => "xml",
        Format::SqlBinding => "sql",
        Format::SchemaBinding => "gql",
        Format::TextMarshal => "text",
        Format::EntValues => "ent",
        Format::StringOf | Format::SchemaText => "",
    }
}

/// Identifiers derived from the enum type name.
struct Names {
    ty: String,
    receiver: String,
    plural: String,
}

impl Names {
    fn new(enum_name: &str) -> Self {
        Self {
            ty: enum_name.to_string(),
            receiver: format!("{}_enum", enum_name.to_lowercase()),
            plural: pluralize(enum_name),
        }
    }
}

fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u') | None) {
            return format!("{}ies", stem);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

fn preamble(out: &mut String, package: &str, imports: &[&str]) {
    out.push_str(HEADER);
    out.push_str(&format!("package {}\n\n", package));
    if !imports.is_empty() {
        out.push_str("import (\n");
        for import in imports {
            out.push_str(&format!("\t\"{}\"\n", import));
        }
        out.push_str(")\n\n");
    }
}

fn symbol_list(members: &[&MemberDescriptor]) -> String {
    members
        .iter()
        .map(|m| m.symbol.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn go_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// `*recv = *enum` after a successful lookup of `str`.
fn assign_from_string(out: &mut String, names: &Names) {
    out.push_str(&format!(
        "\tenum, err := {}FromString(str)\n\tif err != nil {{\n\t\treturn err\n\t}}\n\n",
        names.ty
    ));
    out.push_str(&format!("\t*{} = *enum\n\treturn nil\n}}\n", names.receiver));
}

fn validate_first(out: &mut String, names: &Names, zero: &str) {
    out.push_str(&format!(
        "\terr := {}.Validate()\n\tif err != nil {{\n\t\treturn {}, err\n\t}}\n\n",
        names.receiver, zero
    ));
}

fn render_enum(descriptor: &FormatDescriptor, package: &str, names: &Names) -> String {
    let Names {
        ty,
        receiver,
        plural,
    } = names;
    let all: Vec<&MemberDescriptor> = descriptor.members.iter().collect();
    let valid: Vec<&MemberDescriptor> = descriptor.valid_members().collect();
    let default = descriptor.default_member();
    let underlying = &descriptor.underlying.name;

    let mut out = String::new();
    preamble(&mut out, package, &["fmt"]);

    for (func, members) in [(format!("All{}", plural), &all), (format!("valid{}", plural), &valid)] {
        out.push_str(&format!("func {}() []{} {{\n\treturn []{}{{\n", func, ty, ty));
        for member in members.iter() {
            out.push_str(&format!("\t\t{},\n", member.symbol));
        }
        out.push_str("\t}\n}\n\n");
    }

    // To<Enum>: raw value to member, falling back to the default
    match default {
        Some(default) => {
            out.push_str(&format!("func To{}(value {}) {} {{\n", ty, underlying, ty));
            out.push_str(&format!("\t{} := {}(value)\n", receiver, ty));
            out.push_str(&format!("\tswitch {} {{\n", receiver));
            if !valid.is_empty() {
                out.push_str(&format!("\tcase {}:\n\t\treturn {}\n", symbol_list(&valid), receiver));
            }
            out.push_str(&format!("\tdefault:\n\t\treturn {}\n\t}}\n}}\n\n", default.symbol));
        }
        None => {
            out.push_str(&format!("func To{}(value {}) ({}, error) {{\n", ty, underlying, ty));
            out.push_str(&format!("\t{} := {}(value)\n", receiver, ty));
            out.push_str(&format!("\tswitch {} {{\n", receiver));
            if !valid.is_empty() {
                out.push_str(&format!(
                    "\tcase {}:\n\t\treturn {}, nil\n",
                    symbol_list(&valid),
                    receiver
                ));
            }
            out.push_str(&format!(
                "\tdefault:\n\t\treturn {}, fmt.Errorf(\"%v is not a valid {}\", value)\n\t}}\n}}\n\n",
                receiver, ty
            ));
        }
    }

    if !descriptor.custom_stringer {
        out.push_str(&format!("func ({} {}) String() string {{\n", receiver, ty));
        out.push_str(&format!("\tswitch {} {{\n", receiver));
        for member in &all {
            out.push_str(&format!(
                "\tcase {}:\n\t\treturn {}\n",
                member.symbol,
                go_string(&member.canonical)
            ));
        }
        match default {
            Some(default) => {
                out.push_str(&format!("\tdefault:\n\t\treturn {}.String()\n", default.symbol))
            }
            None => out.push_str(&format!(
                "\tdefault:\n\t\treturn fmt.Sprintf(\"{}(%v)\", {}({}))\n",
                ty, underlying, receiver
            )),
        }
        out.push_str("\t}\n}\n\n");
    }

    out.push_str(&format!("func {}FromString(val string) (*{}, error) {{\n", ty, ty));
    out.push_str(&format!("\tvalid := valid{}()\n", plural));
    out.push_str("\tfor i := range valid {\n\t\tif valid[i].String() == val {\n");
    out.push_str("\t\t\treturn &valid[i], nil\n\t\t}\n\t}\n\n");
    out.push_str(&format!(
        "\treturn nil, fmt.Errorf(\"%s is not a valid {}\", val)\n}}\n\n",
        ty
    ));

    out.push_str(&format!("func ({} {}) Validate() error {{\n", receiver, ty));
    out.push_str(&format!(
        "\t_, err := {}FromString({}.String())\n\treturn err\n}}\n",
        ty, receiver
    ));

    out
}

fn render_json(package: &str, names: &Names) -> String {
    let Names { ty, receiver, .. } = names;
    let mut out = String::new();
    preamble(&mut out, package, &["encoding/json"]);

    out.push_str(&format!("func ({} {}) MarshalJSON() ([]byte, error) {{\n", receiver, ty));
    validate_first(&mut out, names, "nil");
    out.push_str(&format!("\treturn json.Marshal({}.String())\n}}\n\n", receiver));

    out.push_str(&format!("func ({} *{}) UnmarshalJSON(val []byte) error {{\n", receiver, ty));
    out.push_str("\tvar str string\n\tif err := json.Unmarshal(val, &str); err != nil {\n");
    out.push_str("\t\treturn err\n\t}\n\n");
    assign_from_string(&mut out, names);
    out
}

fn render_bson(package: &str, names: &Names) -> String {
    let Names { ty, receiver, .. } = names;
    let mut out = String::new();
    preamble(&mut out, package, &["github.com/globalsign/mgo/bson"]);

    out.push_str(&format!("func ({} {}) GetBSON() (interface{{}}, error) {{\n", receiver, ty));
    validate_first(&mut out, names, "nil");
    out.push_str(&format!("\treturn {}.String(), nil\n}}\n\n", receiver));

    out.push_str(&format!("func ({} *{}) SetBSON(raw bson.Raw) error {{\n", receiver, ty));
    out.push_str("\tvar str string\n\n\terr := raw.Unmarshal(&str)\n");
    out.push_str("\tif err != nil {\n\t\treturn err\n\t}\n\n");
    assign_from_string(&mut out, names);
    out
}

fn render_xml(package: &str, names: &Names) -> String {
    let Names { ty, receiver, .. } = names;
    let mut out = String::new();
    preamble(&mut out, package, &["encoding/xml"]);

    out.push_str(&format!(
        "func ({} {}) MarshalXML(e *xml.Encoder, start xml.StartElement) error {{\n",
        receiver, ty
    ));
    out.push_str(&format!(
        "\tif err := {}.Validate(); err != nil {{\n\t\treturn err\n\t}}\n\n",
        receiver
    ));
    out.push_str(&format!("\treturn e.EncodeElement({}.String(), start)\n}}\n\n", receiver));

    out.push_str(&format!(
        "func ({} *{}) UnmarshalXML(d *xml.Decoder, start xml.StartElement) error {{\n",
        receiver, ty
    ));
    out.push_str("\tvar str string\n\tif err := d.DecodeElement(&str, &start); err != nil {\n");
    out.push_str("\t\treturn err\n\t}\n\n");
    assign_from_string(&mut out, names);
    out
}

fn render_sql(package: &str, names: &Names) -> String {
    let Names { ty, receiver, .. } = names;
    let mut out = String::new();
    preamble(&mut out, package, &["database/sql/driver", "fmt"]);

    out.push_str(&format!("func ({} {}) Value() (driver.Value, error) {{\n", receiver, ty));
    validate_first(&mut out, names, "nil");
    out.push_str(&format!("\treturn {}.String(), nil\n}}\n\n", receiver));

    out.push_str(&format!("func ({} *{}) Scan(val any) error {{\n", receiver, ty));
    out.push_str("\tvar str string\n\n\tswitch v := val.(type) {\n");
    out.push_str("\tcase string:\n\t\tstr = v\n\tcase []byte:\n\t\tstr = string(v)\n");
    out.push_str("\tdefault:\n\t\treturn fmt.Errorf(\"unsupported type %T\", v)\n\t}\n\n");
    assign_from_string(&mut out, names);
    out
}

fn render_gql(package: &str, names: &Names) -> String {
    let Names { ty, receiver, .. } = names;
    let mut out = String::new();
    preamble(&mut out, package, &["context", "fmt", "io", "strconv"]);

    out.push_str(&format!(
        "func ({} {}) MarshalGQLContext(_ context.Context, w io.Writer) error {{\n",
        receiver, ty
    ));
    out.push_str(&format!(
        "\tif err := {}.Validate(); err != nil {{\n\t\treturn err\n\t}}\n\n",
        receiver
    ));
    out.push_str(&format!(
        "\t_, err := io.WriteString(w, strconv.Quote({}.String()))\n\treturn err\n}}\n\n",
        receiver
    ));

    out.push_str(&format!(
        "func ({} *{}) UnmarshalGQLContext(_ context.Context, v any) error {{\n",
        receiver, ty
    ));
    out.push_str("\tstr, ok := v.(string)\n\tif !ok {\n");
    out.push_str("\t\treturn fmt.Errorf(\"enums must be strings\")\n\t}\n\n");
    assign_from_string(&mut out, names);
    out
}

fn render_text(package: &str, names: &Names) -> String {
    let Names { ty, receiver, .. } = names;
    let mut out = String::new();
    preamble(&mut out, package, &[]);

    out.push_str(&format!("func ({} {}) MarshalText() ([]byte, error) {{\n", receiver, ty));
    validate_first(&mut out, names, "nil");
    out.push_str(&format!("\treturn []byte({}.String()), nil\n}}\n\n", receiver));

    out.push_str(&format!("func ({} *{}) UnmarshalText(text []byte) error {{\n", receiver, ty));
    out.push_str("\tstr := string(text)\n\n");
    assign_from_string(&mut out, names);
    out
}

/// ent reads the allowed values of an enum field from `Values()`.
fn render_ent(package: &str, names: &Names) -> String {
    let Names { ty, plural, .. } = names;
    let mut out = String::new();
    preamble(&mut out, package, &[]);

    out.push_str(&format!("func ({}) Values() []string {{
", ty));
    out.push_str(&format!("	valid := valid{}()
", plural));
    out.push_str("	values := make([]string, 0, len(valid))
");
    out.push_str("	for _, v := range valid {
		values = append(values, v.String())
	}

");
    out.push_str("	return values
}
");
    out
}

fn render_schema(descriptor: &FormatDescriptor) -> String {
    let mut out = format!("enum {} {{\n", descriptor.enum_name);
    for canonical in descriptor.listing() {
        out.push_str(&format!("  {}\n", canonical));
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate;
    use crate::ir::{RawMember, UnderlyingType};
    use crate::model::{EnumDefinition, NamingPolicy};
    use std::collections::BTreeSet;

    fn descriptor(format: Format, with_default: bool) -> FormatDescriptor {
        let ty = || UnderlyingType::new("int");
        let unknown = RawMember::new("Unknown", 0i128, "Day", ty());
        let unknown = if with_default {
            unknown.with_comment("//enum:invalid,default")
        } else {
            unknown.with_comment("//enum:invalid")
        };
        let members = vec![
            unknown,
            RawMember::new("Monday", 1i128, "Day", ty()),
            RawMember::new("Tuesday", 2i128, "Day", ty()),
        ];
        let definition =
            EnumDefinition::build("Day", members, &NamingPolicy::new("Day", "snake")).unwrap();
        let formats: BTreeSet<Format> = [format].into();
        generate(&definition, &formats, false).remove(0)
    }

    fn ctx() -> RenderContext {
        RenderContext::new("day", "day")
    }

    #[test]
    fn plurals() {
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Biscuit"), "Biscuits");
        assert_eq!(pluralize("Status"), "Statuses");
        assert_eq!(pluralize("Box"), "Boxes");
    }

    #[test]
    fn enum_file() {
        let out = GO_RENDERER.render(&descriptor(Format::StringOf, true), &ctx());
        assert!(out.starts_with("// Code generated by enumgen, DO NOT EDIT.\npackage day\n"));
        assert!(out.contains("func AllDays() []Day {\n\treturn []Day{\n\t\tUnknown,\n\t\tMonday,\n\t\tTuesday,\n\t}\n}"));
        assert!(out.contains("func validDays() []Day {\n\treturn []Day{\n\t\tMonday,\n\t\tTuesday,\n\t}\n}"));
        assert!(out.contains("func ToDay(value int) Day {"));
        assert!(out.contains("\tcase Monday, Tuesday:\n\t\treturn day_enum\n\tdefault:\n\t\treturn Unknown\n"));
        assert!(out.contains("\tcase Unknown:\n\t\treturn \"unknown\"\n"));
        assert!(out.contains("\tdefault:\n\t\treturn Unknown.String()\n"));
        assert!(out.contains("fmt.Errorf(\"%s is not a valid Day\", val)"));
        assert!(out.contains("func (day_enum Day) Validate() error {"));
    }

    #[test]
    fn enum_file_without_default() {
        let out = GO_RENDERER.render(&descriptor(Format::StringOf, false), &ctx());
        assert!(out.contains("func ToDay(value int) (Day, error) {"));
        assert!(out.contains("fmt.Sprintf(\"Day(%v)\", int(day_enum))"));
    }

    #[test]
    fn custom_stringer_skips_string_method() {
        let mut descriptor = descriptor(Format::StringOf, true);
        descriptor.custom_stringer = true;
        let out = GO_RENDERER.render(&descriptor, &ctx());
        assert!(!out.contains(") String() string"));
        assert!(out.contains("valid[i].String() == val"));
    }

    #[test]
    fn marshal_files() {
        let sql = GO_RENDERER.render(&descriptor(Format::SqlBinding, true), &ctx());
        assert!(sql.contains("\"database/sql/driver\""));
        assert!(sql.contains("return fmt.Errorf(\"unsupported type %T\", v)"));
        assert!(sql.contains("*day_enum = *enum"));

        let gql = GO_RENDERER.render(&descriptor(Format::SchemaBinding, true), &ctx());
        assert!(gql.contains("fmt.Errorf(\"enums must be strings\")"));

        let bson = GO_RENDERER.render(&descriptor(Format::DocumentStore, true), &ctx());
        assert!(bson.contains("func (day_enum *Day) SetBSON(raw bson.Raw) error {"));

        let text = GO_RENDERER.render(&descriptor(Format::TextMarshal, true), &ctx());
        assert!(!text.contains("import"));

        let ent = GO_RENDERER.render(&descriptor(Format::EntValues, true), &ctx());
        assert!(ent.contains("func (Day) Values() []string {\n\tvalid := validDays()\n"));
        assert!(ent.contains("values = append(values, v.String())"));
    }

    #[test]
    fn schema_text() {
        let out = GO_RENDERER.render(&descriptor(Format::SchemaText, true), &ctx());
        insta::assert_snapshot!(out, @r"
enum Day {
  monday
  tuesday
}
");
    }

    #[test]
    fn suffixes() {
        assert_eq!(GO_RENDERER.file_suffix(Format::StringOf), "_enum.go");
        assert_eq!(GO_RENDERER.file_suffix(Format::DocumentStore), "_enum_marshal_bson.go");
        assert_eq!(GO_RENDERER.file_suffix(Format::SchemaBinding), "_enum_marshal_gql.go");
        assert_eq!(GO_RENDERER.file_suffix(Format::SchemaText), "_enum.graphql");
        assert_eq!(GO_RENDERER.file_suffix(Format::EntValues), "_enum_marshal_ent.go");
    }
}
