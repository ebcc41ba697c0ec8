//! Go Template
//!
//! Writes the bindings for one collection. The blocks always appear in the
//! same order, and every per-field block lists programs, then maps, then
//! sections, each sorted by name.
//!
//! The output is laid out with tabs but not aligned; alignment is left to the
//! formatter.

use std::fmt::{self, Write};

use bpfgen_ir::{ClassifiedName, GenerationContext, NameClass};

use crate::funcs::TemplateFuncs;
use crate::quote::go_quote;

/// Import path of the Go loader library.
pub const EBPF_MODULE: &str = "github.com/cilium/ebpf";

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by bpfgen; DO NOT EDIT.";

/// A field of the generated containers.
struct Field<'a> {
    class: NameClass,
    /// Name in the object file.
    name: &'a str,
    /// Go field identifier, prefix included.
    ident: String,
}

impl Field<'_> {
    fn spec_type(&self) -> &'static str {
        match self.class {
            NameClass::Program => "*ebpf.ProgramSpec",
            NameClass::Map | NameClass::Section => "*ebpf.MapSpec",
        }
    }

    fn object_type(&self) -> &'static str {
        match self.class {
            NameClass::Program => "*ebpf.Program",
            NameClass::Map | NameClass::Section => "*ebpf.Map",
        }
    }
}

pub(crate) struct Template<'a, W> {
    out: &'a mut W,
    ctx: &'a GenerationContext,
    funcs: &'a TemplateFuncs,
    fields: Vec<Field<'a>>,
}

impl<'a, W: Write> Template<'a, W> {
    pub(crate) fn new(out: &'a mut W, ctx: &'a GenerationContext, funcs: &'a TemplateFuncs) -> Self {
        let fields = ctx
            .fields()
            .map(|ClassifiedName { class, name }| Field {
                class,
                name,
                ident: format!("{}{}", class.field_prefix(), funcs.identifier(name)),
            })
            .collect();
        Template {
            out,
            ctx,
            funcs,
            fields,
        }
    }

    pub(crate) fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn write(mut self) -> fmt::Result {
        self.header()?;
        self.specs_type()?;
        self.new_specs()?;
        self.collection_spec()?;
        self.load()?;
        self.copy()?;
        self.objects_type()?;
        self.close()?;
        self.bytes()
    }

    fn header(&mut self) -> fmt::Result {
        writeln!(self.out, "{HEADER}")?;
        for tag in self.ctx.tags() {
            writeln!(self.out, "// +build {tag}")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "package {}", self.ctx.package())?;
        writeln!(self.out)?;
        writeln!(self.out, "import (")?;
        for import in ["bytes", "fmt", "io"] {
            writeln!(self.out, "\t\"{import}\"")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "\t\"{EBPF_MODULE}\"")?;
        writeln!(self.out, ")")
    }

    fn specs_type(&mut self) -> fmt::Result {
        writeln!(self.out)?;
        writeln!(self.out, "type {} struct {{", self.ctx.name().specs())?;
        for field in &self.fields {
            let tag = self.funcs.tag(field.name);
            writeln!(self.out, "\t{} {} {tag}", field.ident, field.spec_type())?;
        }
        writeln!(self.out, "}}")
    }

    fn new_specs(&mut self) -> fmt::Result {
        let name = self.ctx.name();
        let (specs, base) = (name.specs(), name.base());

        writeln!(self.out)?;
        writeln!(self.out, "func {}() (*{specs}, error) {{", name.new_specs())?;
        writeln!(self.out, "\treader := bytes.NewReader({})", name.bytes())?;
        writeln!(self.out, "\tspec, err := ebpf.LoadCollectionSpecFromReader(reader)")?;
        writeln!(self.out, "\tif err != nil {{")?;
        writeln!(self.out, "\t\treturn nil, fmt.Errorf(\"can't load {base}: %w\", err)")?;
        writeln!(self.out, "\t}}")?;
        writeln!(self.out)?;
        writeln!(self.out, "\tspecs := new({specs})")?;
        writeln!(self.out, "\tif err := spec.LoadAndAssign(specs, nil); err != nil {{")?;
        writeln!(self.out, "\t\treturn nil, fmt.Errorf(\"can't assign {base}: %w\", err)")?;
        writeln!(self.out, "\t}}")?;
        writeln!(self.out)?;
        writeln!(self.out, "\treturn specs, nil")?;
        writeln!(self.out, "}}")
    }

    fn collection_spec(&mut self) -> fmt::Result {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "func (s *{}) CollectionSpec() *ebpf.CollectionSpec {{",
            self.ctx.name().specs()
        )?;
        writeln!(self.out, "\treturn &ebpf.CollectionSpec{{")?;

        writeln!(self.out, "\t\tPrograms: map[string]*ebpf.ProgramSpec{{")?;
        for field in self.fields.iter().filter(|f| f.class == NameClass::Program) {
            writeln!(self.out, "\t\t\t{}: s.{},", go_quote(field.name), field.ident)?;
        }
        writeln!(self.out, "\t\t}},")?;

        writeln!(self.out, "\t\tMaps: map[string]*ebpf.MapSpec{{")?;
        for field in self.fields.iter().filter(|f| f.class != NameClass::Program) {
            writeln!(self.out, "\t\t\t{}: s.{},", go_quote(field.name), field.ident)?;
        }
        writeln!(self.out, "\t\t}},")?;

        writeln!(self.out, "\t}}")?;
        writeln!(self.out, "}}")
    }

    fn load(&mut self) -> fmt::Result {
        let name = self.ctx.name();
        let (specs, objects) = (name.specs(), name.objects());

        writeln!(self.out)?;
        writeln!(
            self.out,
            "func (s *{specs}) Load(opts *ebpf.CollectionOptions) (*{objects}, error) {{"
        )?;
        writeln!(self.out, "\tvar objs {objects}")?;
        writeln!(
            self.out,
            "\tif err := s.CollectionSpec().LoadAndAssign(&objs, opts); err != nil {{"
        )?;
        writeln!(self.out, "\t\treturn nil, err")?;
        writeln!(self.out, "\t}}")?;
        writeln!(self.out, "\treturn &objs, nil")?;
        writeln!(self.out, "}}")
    }

    fn copy(&mut self) -> fmt::Result {
        let specs = self.ctx.name().specs();

        writeln!(self.out)?;
        writeln!(self.out, "func (s *{specs}) Copy() *{specs} {{")?;
        writeln!(self.out, "\treturn &{specs}{{")?;
        for field in &self.fields {
            writeln!(self.out, "\t\t{0}: s.{0}.Copy(),", field.ident)?;
        }
        writeln!(self.out, "\t}}")?;
        writeln!(self.out, "}}")
    }

    fn objects_type(&mut self) -> fmt::Result {
        writeln!(self.out)?;
        writeln!(self.out, "type {} struct {{", self.ctx.name().objects())?;
        for field in &self.fields {
            let tag = self.funcs.tag(field.name);
            writeln!(self.out, "\t{} {} {tag}", field.ident, field.object_type())?;
        }
        writeln!(self.out, "}}")
    }

    /// Handles are released programs first; the first failure stops the loop.
    fn close(&mut self) -> fmt::Result {
        writeln!(self.out)?;
        writeln!(self.out, "func (o *{}) Close() error {{", self.ctx.name().objects())?;
        writeln!(self.out, "\tfor _, closer := range []io.Closer{{")?;
        for field in &self.fields {
            writeln!(self.out, "\t\to.{},", field.ident)?;
        }
        writeln!(self.out, "\t}} {{")?;
        writeln!(self.out, "\t\tif err := closer.Close(); err != nil {{")?;
        writeln!(self.out, "\t\t\treturn err")?;
        writeln!(self.out, "\t\t}}")?;
        writeln!(self.out, "\t}}")?;
        writeln!(self.out, "\treturn nil")?;
        writeln!(self.out, "}}")
    }

    fn bytes(&mut self) -> fmt::Result {
        writeln!(self.out)?;
        writeln!(self.out, "// Do not access this directly.")?;
        writeln!(
            self.out,
            "var {} = []byte(\"{}\")",
            self.ctx.name().bytes(),
            self.ctx.bytes()
        )
    }
}
