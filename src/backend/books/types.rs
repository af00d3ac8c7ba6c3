/**
 * Book Handler Types
 */

use serde::{Deserialize, Serialize};

use crate::shared::{Book, BookId, BookSummary, Geocode, Location, PageIndex, PageKey, Size, Stamp, Transform};

/// Format of the `date` recorded on a new stamp ("Oct 16, 2026 3:04 PM")
pub const STAMP_DATE_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookCreateRequest {
    pub uid: String,
    pub city: String,
    pub state: String,
    /// Seed attractions; each becomes a placeholder page entry
    #[serde(default)]
    pub attractions: Option<Vec<Location>>,
}

impl BookCreateRequest {
    pub fn seeds(&self) -> &[Location] {
        self.attractions.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookCreateResponse {
    pub message: String,
    pub book_id: BookId,
    pub book_data: Book,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StampCreateRequest {
    pub uid: String,
    #[serde(alias = "bookid")]
    pub book_id: String,
    pub location_name: String,
    pub geocode: Geocode,
    pub photo_url: String,
    pub stamp_url: String,
    pub stamp_size: Size,
    pub stamp_transformation: Transform,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StampCreateRequest {
    /// Build the stamp recorded at `date`
    pub fn into_stamp(self, date: String) -> Stamp {
        Stamp {
            photo_url: self.photo_url,
            stamp_url: self.stamp_url,
            stamp_transformation: self.stamp_transformation,
            stamp_size: self.stamp_size,
            date,
            notes: self.notes.filter(|notes| !notes.trim().is_empty()),
            location: Location::new(self.location_name, self.geocode),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StampCreateResponse {
    pub message: String,
    pub book_id: BookId,
    /// Bucket the stamp was appended to
    pub page: PageKey,
    pub stamp: Stamp,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookListResponse {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub book_id: BookId,
    #[serde(flatten)]
    pub book: Book,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PagesResponse {
    pub book_id: BookId,
    /// `null` until the book is seeded or stamped
    pub pages: Option<PageIndex>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_request_accepts_bookid_alias() {
        let request: StampCreateRequest = serde_json::from_value(serde_json::json!({
            "uid": "u1",
            "bookid": "8c7e4d4e-0f55-4d7a-9d59-0c4bb0d0f7a1",
            "location_name": "Alamo",
            "geocode": { "lat": 29.4260, "lng": -98.4861 },
            "photo_url": "https://cdn.example/p.jpg",
            "stamp_url": "https://cdn.example/s.png",
            "stamp_size": { "width": 100.0, "height": 80.0 },
            "stamp_transformation": { "position": { "x": 0.0, "y": 0.0 }, "scale": 1.0, "rotation": 0.0 },
            "notes": "  "
        }))
        .unwrap();
        assert_eq!(request.book_id, "8c7e4d4e-0f55-4d7a-9d59-0c4bb0d0f7a1");

        let stamp = request.into_stamp("Oct 16, 2026 3:04 PM".to_string());
        assert_eq!(stamp.location.name, "Alamo");
        assert_eq!(stamp.notes, None);
    }

    #[test]
    fn test_date_format() {
        use chrono::TimeZone;
        let at = chrono::Utc.with_ymd_and_hms(2026, 10, 16, 15, 4, 0).unwrap();
        assert_eq!(at.format(STAMP_DATE_FORMAT).to_string(), "Oct 16, 2026 3:04 PM");
    }
}
