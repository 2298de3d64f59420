//! Builders for seeding the job tables.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::Set;

use pagefetch::db::entities::{page_job, product};

/// Fixed base time; `minute` offsets give a deterministic insertion order.
pub fn at_minute(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(8, minute, 0)
        .unwrap()
}

pub struct ProductBuilder {
    id: i64,
    cc_id: String,
    folder: Option<String>,
}

impl ProductBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            cc_id: format!("CC{}", id),
            folder: Some(format!("products/CC{}", id)),
        }
    }

    pub fn cc_id(mut self, cc_id: &str) -> Self {
        self.cc_id = cc_id.to_string();
        self
    }

    pub fn folder(mut self, folder: &str) -> Self {
        self.folder = Some(folder.to_string());
        self
    }

    pub fn no_folder(mut self) -> Self {
        self.folder = None;
        self
    }

    pub fn build(self) -> product::ActiveModel {
        product::ActiveModel {
            id: Set(self.id),
            cc_id: Set(self.cc_id),
            product_folder_path: Set(self.folder),
        }
    }
}

pub struct JobBuilder {
    id: i64,
    scope_id: i64,
    product_id: i64,
    url: Option<String>,
    folder_timestamp: String,
    status: String,
    inserted_at: NaiveDateTime,
}

impl JobBuilder {
    pub fn new(id: i64, product_id: i64) -> Self {
        Self {
            id,
            scope_id: 1,
            product_id,
            url: Some(format!("https://shop.example.com/p/{}", id)),
            folder_timestamp: "20260101T080000".to_string(),
            status: "pending".to_string(),
            inserted_at: at_minute(id as u32 % 60),
        }
    }

    pub fn scope(mut self, scope_id: i64) -> Self {
        self.scope_id = scope_id;
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn no_url(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn timestamp(mut self, token: &str) -> Self {
        self.folder_timestamp = token.to_string();
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn inserted_at_minute(mut self, minute: u32) -> Self {
        self.inserted_at = at_minute(minute);
        self
    }

    pub fn build(self) -> page_job::ActiveModel {
        page_job::ActiveModel {
            id: Set(self.id),
            gap_data_fetch_id: Set(self.scope_id),
            product_id: Set(self.product_id),
            product_page_url: Set(self.url),
            folder_timestamp: Set(self.folder_timestamp),
            page_fetch_status: Set(self.status),
            html_file_path: Set(None),
            inserted_at: Set(self.inserted_at),
            updated_at: Set(self.inserted_at),
        }
    }
}
