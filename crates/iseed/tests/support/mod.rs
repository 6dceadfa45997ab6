//! Shared helpers for integration tests: an in-memory SQLite source and a
//! reader for the PHP array literals found in generated seeders.

#![allow(dead_code)]

use iseed::db::{Connections, SourcePool};
use iseed::models::SeedValue;
use iseed::{IseedConfig, SeedGenerator};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Single-connection in-memory database; every connection would get its own database.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite")
}

pub async fn exec(pool: &SqlitePool, sql: &str) {
    sqlx::query(sql)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to execute {sql}: {e}"));
}

/// `products(id, name, price)` with ids 1..=count.
pub async fn create_products(pool: &SqlitePool, count: usize) {
    exec(
        pool,
        "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL)",
    )
    .await;
    if count > 0 {
        exec(
            pool,
            &format!(
                "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < {count}) \
                 INSERT INTO products (id, name, price) SELECT n, 'Product ' || n, n * 1.5 FROM seq"
            ),
        )
        .await;
    }
}

pub fn test_config(base: &std::path::Path) -> IseedConfig {
    IseedConfig {
        base_path: base.to_path_buf(),
        ..IseedConfig::default()
    }
}

pub fn generator(config: IseedConfig, pool: SqlitePool) -> SeedGenerator {
    let connections =
        Connections::from_config(&config).with_pool("default", SourcePool::Sqlite(pool));
    SeedGenerator::with_connections(config, connections)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhpKey {
    Int(i64),
    Str(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Vec<u8>),
    Array(Vec<(Option<PhpKey>, PhpValue)>),
}

impl PhpValue {
    pub fn entries(&self) -> &[(Option<PhpKey>, PhpValue)] {
        match self {
            PhpValue::Array(entries) => entries,
            other => panic!("expected array, got {other:?}"),
        }
    }

    /// Value stored under the string key `key`.
    pub fn field(&self, key: &str) -> Option<&PhpValue> {
        self.entries()
            .iter()
            .find(|(k, _)| *k == Some(PhpKey::Str(key.as_bytes().to_vec())))
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|(k, _)| match k {
                Some(PhpKey::Str(s)) => Some(String::from_utf8_lossy(s).into_owned()),
                _ => None,
            })
            .collect()
    }

    pub fn matches(&self, value: &SeedValue) -> bool {
        match (self, value) {
            (PhpValue::Null, SeedValue::Null) => true,
            (PhpValue::Bool(a), SeedValue::Bool(b)) => a == b,
            (PhpValue::Int(a), SeedValue::Int(b)) => a == b,
            (PhpValue::Float(a), SeedValue::Float(b)) => {
                (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
            }
            (PhpValue::Str(a), SeedValue::Text(b)) => a == b.as_bytes(),
            (PhpValue::Str(a), SeedValue::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

/// Minimal reader for the PHP literal syntax the generator emits.
pub struct PhpReader<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> PhpReader<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn rest(&self) -> &[u8] {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\n' | b'\r' | b'\t')) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token.as_bytes()) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) {
        assert!(
            self.eat(token),
            "expected {token:?} at {}: {:?}",
            self.pos,
            String::from_utf8_lossy(&self.rest()[..self.rest().len().min(40)])
        );
    }

    pub fn value(&mut self) -> PhpValue {
        self.skip_ws();
        if self.eat("array") {
            return self.array();
        }
        for (token, value) in [
            ("NULL", PhpValue::Null),
            ("true", PhpValue::Bool(true)),
            ("false", PhpValue::Bool(false)),
            ("NAN", PhpValue::Float(f64::NAN)),
            ("INF", PhpValue::Float(f64::INFINITY)),
            ("-INF", PhpValue::Float(f64::NEG_INFINITY)),
        ] {
            if self.eat(token) {
                return value;
            }
        }
        match self.peek() {
            Some(b'\'') => self.single_quoted(),
            Some(b'"') => self.double_quoted(),
            _ => self.number(),
        }
    }

    fn array(&mut self) -> PhpValue {
        self.skip_ws();
        self.expect("(");
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(")") {
                return PhpValue::Array(entries);
            }
            let first = self.value();
            self.skip_ws();
            let entry = if self.eat("=>") {
                let key = match first {
                    PhpValue::Int(i) => PhpKey::Int(i),
                    PhpValue::Str(s) => PhpKey::Str(s),
                    other => panic!("invalid array key {other:?}"),
                };
                (Some(key), self.value())
            } else {
                (None, first)
            };
            entries.push(entry);
            self.skip_ws();
            self.expect(",");
        }
    }

    fn single_quoted(&mut self) -> PhpValue {
        self.expect("'");
        let mut out = Vec::new();
        loop {
            let c = self.peek().expect("unterminated string");
            self.pos += 1;
            match c {
                b'\'' => return PhpValue::Str(out),
                b'\\' if matches!(self.peek(), Some(b'\\' | b'\'')) => {
                    out.push(self.src[self.pos]);
                    self.pos += 1;
                }
                _ => out.push(c),
            }
        }
    }

    fn double_quoted(&mut self) -> PhpValue {
        self.expect("\"");
        let mut out = Vec::new();
        loop {
            let c = self.peek().expect("unterminated string");
            self.pos += 1;
            match c {
                b'"' => return PhpValue::Str(out),
                b'\\' => {
                    let e = self.peek().expect("dangling escape");
                    self.pos += 1;
                    match e {
                        b'\\' | b'"' | b'$' => out.push(e),
                        b'n' => out.push(b'\n'),
                        b't' => out.push(b'\t'),
                        b'r' => out.push(b'\r'),
                        b'x' => {
                            let hex = std::str::from_utf8(&self.src[self.pos..self.pos + 2])
                                .expect("hex escape");
                            out.push(u8::from_str_radix(hex, 16).expect("hex escape"));
                            self.pos += 2;
                        }
                        other => {
                            out.push(b'\\');
                            out.push(other);
                        }
                    }
                }
                _ => out.push(c),
            }
        }
    }

    fn number(&mut self) -> PhpValue {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => {}
                b'.' | b'e' | b'E' => is_float = true,
                b'+' | b'-' if is_float && matches!(self.src[self.pos - 1], b'e' | b'E') => {}
                _ => break,
            }
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).expect("number");
        if is_float {
            return PhpValue::Float(text.parse().expect("float literal"));
        }
        let value: i64 = text.parse().expect("integer literal");
        // `-9223372036854775807-1`
        if self.eat("-1") {
            return PhpValue::Int(value - 1);
        }
        PhpValue::Int(value)
    }
}

/// Every `->insert(<array>);` batch in a generated seeder, in order.
pub fn inserted_batches(seeder: &str) -> Vec<PhpValue> {
    let mut batches = Vec::new();
    let mut offset = 0;
    while let Some(found) = seeder[offset..].find("->insert(") {
        let start = offset + found + "->insert(".len();
        let mut reader = PhpReader::new(&seeder[start..]);
        let batch = reader.value();
        reader.expect(");");
        offset = start + reader.position();
        batches.push(batch);
    }
    batches
}

/// Rows of all batches, flattened.
pub fn inserted_rows(seeder: &str) -> Vec<PhpValue> {
    inserted_batches(seeder)
        .into_iter()
        .flat_map(|batch| match batch {
            PhpValue::Array(entries) => entries.into_iter().map(|(_, row)| row).collect::<Vec<_>>(),
            other => panic!("expected array, got {other:?}"),
        })
        .collect()
}
