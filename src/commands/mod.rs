pub mod check;
pub mod get;
pub mod put;

#[cfg(test)]
mod testing;

use std::io::{Read, Write};

use calendar_resource_core::ResourceResult;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Parse the verb's request; malformed JSON is an input error.
pub fn read_request<T: DeserializeOwned>(reader: impl Read) -> ResourceResult<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write the response as a single JSON line.
pub fn write_response<T: Serialize>(mut writer: impl Write, response: &T) -> ResourceResult<()> {
    serde_json::to_writer(&mut writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
