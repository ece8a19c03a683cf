//! `.cube` (Resolve/Adobe) reading and writing for 33³ grids.
//!
//! ```text
//! # comment
//! TITLE "Blue Architecture"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.000000 0.000000 0.000000
//! ...
//! ```
//! Data rows are red-fastest, which is the grid's own storage order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{LutError, LutResult};
use crate::transform::lut::{ColorGrid, GRID_ENTRIES, GRID_SIZE};

impl ColorGrid {
    /// Load a grid from a `.cube` file.
    pub fn load_cube(path: &Path) -> LutResult<Self> {
        let file = File::open(path)?;
        parse_cube(BufReader::new(file))
    }

    /// Save this grid to a `.cube` file.
    pub fn save_cube(&self, path: &Path, title: Option<&str>) -> LutResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_cube(&mut writer, self, title)?;
        writer.flush()?;
        Ok(())
    }
}

/// Parse a 33³ `.cube` document.
pub fn parse_cube<R: BufRead>(reader: R) -> LutResult<ColorGrid> {
    let mut size: Option<usize> = None;
    let mut domain_min = [0.0_f32; 3];
    let mut domain_max = [1.0_f32; 3];
    let mut entries: Vec<[f32; 3]> = Vec::with_capacity(GRID_ENTRIES);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let line_no = index + 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "TITLE" => {}
            "LUT_3D_SIZE" => {
                let value = parse_size(tokens, line_no)?;
                if value != GRID_SIZE {
                    return Err(LutError::UnsupportedSize(value));
                }
                size = Some(value);
            }
            "LUT_1D_SIZE" => {
                return Err(LutError::Parse {
                    line: line_no,
                    message: "1D LUTs are not supported".into(),
                });
            }
            "DOMAIN_MIN" => domain_min = parse_triple(tokens, line_no)?,
            "DOMAIN_MAX" => domain_max = parse_triple(tokens, line_no)?,
            "LUT_3D_INPUT_RANGE" => {
                let range = parse_pair(tokens, line_no)?;
                domain_min = [range[0]; 3];
                domain_max = [range[1]; 3];
            }
            _ if keyword.parse::<f32>().is_ok() => {
                entries.push(parse_triple(line.split_whitespace(), line_no)?);
            }
            _ => {
                return Err(LutError::Parse {
                    line: line_no,
                    message: format!("unknown keyword \"{keyword}\""),
                });
            }
        }
    }

    if size.is_none() {
        return Err(LutError::Parse {
            line: 0,
            message: "missing LUT_3D_SIZE".into(),
        });
    }
    if domain_min != [0.0; 3] || domain_max != [1.0; 3] {
        return Err(LutError::UnsupportedDomain {
            min: domain_min,
            max: domain_max,
        });
    }

    ColorGrid::from_entries(entries)
}

/// Write `grid` as a `.cube` document.
pub fn write_cube<W: Write>(writer: &mut W, grid: &ColorGrid, title: Option<&str>) -> LutResult<()> {
    if let Some(title) = title {
        writeln!(writer, "TITLE \"{title}\"")?;
    }
    writeln!(writer, "LUT_3D_SIZE {GRID_SIZE}")?;
    writeln!(writer, "DOMAIN_MIN 0.0 0.0 0.0")?;
    writeln!(writer, "DOMAIN_MAX 1.0 1.0 1.0")?;
    for [r, g, b] in grid.entries() {
        writeln!(writer, "{r:.6} {g:.6} {b:.6}")?;
    }
    Ok(())
}

fn parse_size<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> LutResult<usize> {
    let tokens: Vec<&str> = tokens.collect();
    match tokens.as_slice() {
        [value] => value.parse().map_err(|_| LutError::Parse {
            line,
            message: format!("invalid LUT_3D_SIZE \"{value}\""),
        }),
        _ => Err(LutError::Parse {
            line,
            message: format!("LUT_3D_SIZE takes 1 value, found {}", tokens.len()),
        }),
    }
}

fn parse_pair<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> LutResult<[f32; 2]> {
    let values = parse_floats(tokens, line)?;
    <[f32; 2]>::try_from(values.as_slice()).map_err(|_| LutError::Parse {
        line,
        message: format!("expected 2 values, found {}", values.len()),
    })
}

/// Exactly three numbers: a data row or the operands of a `DOMAIN_*` line.
fn parse_triple<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> LutResult<[f32; 3]> {
    let values = parse_floats(tokens, line)?;
    <[f32; 3]>::try_from(values.as_slice()).map_err(|_| LutError::Parse {
        line,
        message: format!("expected 3 values, found {}", values.len()),
    })
}

fn parse_floats<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> LutResult<Vec<f32>> {
    tokens
        .map(|t| {
            t.parse::<f32>().map_err(|_| LutError::Parse {
                line,
                message: format!("invalid number \"{t}\""),
            })
        })
        .collect()
}
