use std::io;

use mapgraph_core::Mapped;

use crate::error::Result;
use crate::options::FormatOptions;

/// A text format for [`Mapped`] graphs.
pub trait Serializer: Send + Sync {
    fn options(&self) -> &FormatOptions;

    fn read(&self, text: &str) -> Result<Mapped>;

    fn read_from(&self, input: &mut dyn io::Read) -> Result<Mapped> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        self.read(&text)
    }

    /// Text of `mapped`, inlining single-referenced objects when `inline` is
    /// set.
    fn to_text_inlined(&self, mapped: &Mapped, inline: bool) -> Result<String>;

    fn to_text(&self, mapped: &Mapped) -> Result<String> {
        self.to_text_inlined(mapped, self.options().inline_single_ref_objects)
    }

    fn write(&self, mapped: &Mapped, out: &mut dyn io::Write) -> Result<()> {
        out.write_all(self.to_text(mapped)?.as_bytes())?;
        Ok(())
    }
}

impl<S: Serializer + ?Sized> Serializer for Box<S> {
    fn options(&self) -> &FormatOptions {
        (**self).options()
    }

    fn read(&self, text: &str) -> Result<Mapped> {
        (**self).read(text)
    }

    fn read_from(&self, input: &mut dyn io::Read) -> Result<Mapped> {
        (**self).read_from(input)
    }

    fn to_text_inlined(&self, mapped: &Mapped, inline: bool) -> Result<String> {
        (**self).to_text_inlined(mapped, inline)
    }

    fn to_text(&self, mapped: &Mapped) -> Result<String> {
        (**self).to_text(mapped)
    }

    fn write(&self, mapped: &Mapped, out: &mut dyn io::Write) -> Result<()> {
        (**self).write(mapped, out)
    }
}
