//! Server-rendered pages for the form interface
//!
//! Plain strings with every user value escaped.

use serde_json::Value;

use crate::record::{Record, ADDRESS_FIELD, NAME_FIELD};

/// What each search hit offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Inline edit form posting to `/update`
    Edit,
    /// Delete-by-name button posting to `/delete_by_name`
    Delete,
}

impl SearchMode {
    fn action(self) -> &'static str {
        match self {
            SearchMode::Edit => "/search_update",
            SearchMode::Delete => "/delete",
        }
    }

    fn title(self) -> &'static str {
        match self {
            SearchMode::Edit => "Cari &amp; Ubah Data",
            SearchMode::Delete => "Hapus Data",
        }
    }
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => escape(s),
        Some(other) => escape(&other.to_string()),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n{body}\n<p><a href=\"/\">Beranda</a></p>\n</body>\n</html>\n"
    )
}

pub fn index_page() -> String {
    page(
        "Data Penduduk",
        "<ul>\n\
         <li><a href=\"/input\">Tambah Data</a></li>\n\
         <li><a href=\"/display_all\">Tampilkan Semua Data</a></li>\n\
         <li><a href=\"/search_update\">Cari &amp; Ubah Data</a></li>\n\
         <li><a href=\"/delete\">Hapus Data</a></li>\n\
         </ul>",
    )
}

pub fn create_form_page() -> String {
    page(
        "Tambah Data",
        "<form method=\"post\" action=\"/input\">\n\
         <label>Nama <input name=\"nama\" required></label>\n\
         <label>Alamat <input name=\"alamat\" required></label>\n\
         <button type=\"submit\">Simpan</button>\n\
         </form>",
    )
}

pub fn confirmation_page(record: &Record) -> String {
    page(
        "Data Tersimpan",
        &format!(
            "<p>Data dengan ID {} berhasil disimpan.</p>\n<p><a href=\"/display_all\">Lihat semua data</a></p>",
            record.id()
        ),
    )
}

pub fn records_table(records: &[Record]) -> String {
    if records.is_empty() {
        return "<p>Tidak ada data.</p>".to_string();
    }

    let mut rows = String::new();
    for record in records {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            record.id(),
            text_of(record.get(NAME_FIELD)),
            text_of(record.get(ADDRESS_FIELD)),
        ));
    }
    format!(
        "<table>\n<tr><th>ID</th><th>Nama</th><th>Alamat</th></tr>\n{}</table>",
        rows
    )
}

pub fn display_all_page(records: &[Record]) -> String {
    page("Semua Data", &records_table(records))
}

fn edit_row(record: &Record) -> String {
    format!(
        "<form method=\"post\" action=\"/update\">\n\
         <input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
         <label>Nama <input name=\"nama\" value=\"{nama}\"></label>\n\
         <label>Alamat <input name=\"alamat\" value=\"{alamat}\"></label>\n\
         <button type=\"submit\">Ubah</button>\n\
         </form>\n",
        id = record.id(),
        nama = text_of(record.get(NAME_FIELD)),
        alamat = text_of(record.get(ADDRESS_FIELD)),
    )
}

fn delete_rows(records: &[Record]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for name in records.iter().filter_map(Record::name) {
        if !names.iter().any(|seen| seen.to_lowercase() == name.to_lowercase()) {
            names.push(name);
        }
    }

    let mut out = records_table(records);
    out.push('\n');
    for name in names {
        out.push_str(&format!(
            "<form method=\"post\" action=\"/delete_by_name\">\n\
             <input type=\"hidden\" name=\"nama\" value=\"{name}\">\n\
             <button type=\"submit\">Hapus semua &quot;{name}&quot;</button>\n\
             </form>\n",
            name = escape(name),
        ));
    }
    out
}

/// Search form plus, after a search, its results
pub fn search_page(mode: SearchMode, query: Option<&str>, hits: &[Record]) -> String {
    let mut body = format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Nama <input name=\"nama\" value=\"{query}\"></label>\n\
         <button type=\"submit\">Cari</button>\n\
         </form>\n",
        action = mode.action(),
        query = escape(query.unwrap_or("")),
    );

    if query.is_some() {
        if hits.is_empty() {
            body.push_str("<p>Data tidak ditemukan.</p>");
        } else {
            match mode {
                SearchMode::Edit => hits.iter().for_each(|r| body.push_str(&edit_row(r))),
                SearchMode::Delete => body.push_str(&delete_rows(hits)),
            }
        }
    }

    page(mode.title(), &body)
}

pub fn error_page(message: &str) -> String {
    page("Terjadi Kesalahan", &format!("<p>{}</p>", escape(message)))
}
