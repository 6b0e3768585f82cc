use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::Path;

use indexmap::IndexMap;
use log::info;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::env::{Action, StateKey};
use crate::error::{Result, WarehouseError};
use crate::policy::TabularPolicy;
use crate::trainer::Trajectory;

type TableFile = IndexMap<String, IndexMap<String, f64>>;

/// Object members in file order, repeated names included.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Writes the table as a JSON object keyed by `"x,y"` (or `"x,y,ox,oy"`),
/// rows in coordinate order and actions in `Action::ALL` order.
pub fn save_table<W: Write>(table: &TabularPolicy<StateKey>, writer: W) -> Result<()> {
    let mut rows: Vec<_> = table.iter().collect();
    rows.sort_by_key(|(key, _)| **key);
    let file: TableFile = rows
        .into_iter()
        .map(|(key, values)| {
            let actions = Action::ALL
                .into_iter()
                .map(|a| (a.name().to_string(), values[a]))
                .collect();
            (key.to_string(), actions)
        })
        .collect();
    serde_json::to_writer_pretty(writer, &file)?;
    Ok(())
}

/// Reads a table written by [`save_table`]. Actions absent from a row read
/// as 0.0.
pub fn load_table<R: Read>(reader: R) -> Result<TabularPolicy<StateKey>> {
    let file: Entries<Entries<f64>> = serde_json::from_reader(reader)
        .map_err(|e| WarehouseError::Deserialization(e.to_string()))?;
    let mut table = TabularPolicy::new(0.0);
    for (key, actions) in file.0 {
        let key: StateKey = key.parse()?;
        if table.contains(&key) {
            return Err(WarehouseError::Deserialization(format!(
                "duplicate state key {key}"
            )));
        }
        let mut values = [0.0; Action::COUNT];
        let mut seen = [false; Action::COUNT];
        for (name, value) in actions.0 {
            let action: Action = name
                .parse()
                .map_err(|e: WarehouseError| WarehouseError::Deserialization(e.to_string()))?;
            if seen[usize::from(action)] {
                return Err(WarehouseError::Deserialization(format!(
                    "duplicate action {action} for state {key}"
                )));
            }
            seen[usize::from(action)] = true;
            values[action] = value;
        }
        table.insert_values(key, values);
    }
    Ok(table)
}

pub fn save_table_to_file<P: AsRef<Path>>(table: &TabularPolicy<StateKey>, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    save_table(table, &mut writer)?;
    writer.flush()?;
    info!("saved {} states to {}", table.len(), path.display());
    Ok(())
}

pub fn load_table_from_file<P: AsRef<Path>>(path: P) -> Result<TabularPolicy<StateKey>> {
    let path = path.as_ref();
    let table = load_table(BufReader::new(File::open(path)?))?;
    info!("loaded {} states from {}", table.len(), path.display());
    Ok(table)
}

pub fn save_trajectory<P: AsRef<Path>>(trajectory: &Trajectory, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, trajectory)?;
    writer.flush()?;
    Ok(())
}
