#![allow(dead_code)]

use std::fmt::Write;
use std::path::{Path, PathBuf};

pub const FILE_NAME: &str = "flowmetertotals_2017-05-16.csv";

pub const HEADER: &str = concat!(
    r#""TOA5","MAC_Irrigation","CR1000","12345","CR1000.Std.32","CPU:flowmeter.CR1","5521","FlowMeterTotals""#,
    "\r\n",
    r#""TIMESTAMP","RECORD","flowmetertotal_Tot","zone""#,
    "\r\n",
    r#""TS","RN","gal","""#,
    "\r\n",
    r#""","","Tot","Smp""#,
    "\r\n",
);

pub fn contents(rows: usize) -> String {
    let mut out = HEADER.to_string();
    for i in 0..rows {
        write!(
            out,
            "\"2017-05-16 {:02}:{:02}:00\",{},{}.25,{}\r\n",
            (i / 60) % 24,
            i % 60,
            i,
            i,
            i % 4
        )
        .unwrap();
    }
    out
}

pub fn write_file(dir: &Path, rows: usize) -> PathBuf {
    let path = dir.join(FILE_NAME);
    std::fs::write(&path, contents(rows)).unwrap();
    path
}
