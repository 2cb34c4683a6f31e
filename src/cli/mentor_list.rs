use std::error::Error;
use std::io::{self, Write};

use crate::core::mentors::MentorRegistry;

pub fn list_mentors() -> Result<(), Box<dyn Error>> {
    let registry = MentorRegistry::builtin();
    let stdout = io::stdout();
    write_mentor_list(&registry, &mut stdout.lock())?;
    Ok(())
}

pub fn write_mentor_list<W: Write>(registry: &MentorRegistry, out: &mut W) -> io::Result<()> {
    if registry.is_empty() {
        writeln!(out, "No mentors available.")?;
        return Ok(());
    }

    writeln!(out, "Available mentors:")?;
    writeln!(out)?;
    for mentor in registry.list_mentors() {
        writeln!(out, "  {} {} [{}]", mentor.avatar, mentor.name, mentor.id)?;
        writeln!(out, "     {}", mentor.title)?;
        writeln!(out, "     \"{}\"", mentor.tagline)?;
        writeln!(out)?;
    }
    writeln!(out, "Consult one with: tribe ask -m <id> <question>")
}
