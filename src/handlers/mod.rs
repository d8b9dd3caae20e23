use serde::{Deserialize, Serialize};

pub mod auth_handler;
pub mod subscription_handler;
pub mod user_handler;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    /// Resolves to (current page, per page, row offset), clamped to sane
    /// bounds.
    pub fn window(&self) -> (u32, u32, i64) {
        let current_page = self.page.unwrap_or(1).max(1);
        let per_page = self.limit.unwrap_or(12).clamp(1, 100);
        let offset = ((current_page - 1) * per_page) as i64;
        (current_page, per_page, offset)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub total_records: i64,
    pub total_pages: u32,
    pub current_page: u32,
    pub records: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn new(total_records: i64, current_page: u32, per_page: u32, records: Vec<T>) -> Self {
        Self {
            total_records,
            total_pages: ((total_records as f64) / (per_page as f64)).ceil() as u32,
            current_page,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_clamps_inputs() {
        let params = PageParams {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(params.window(), (1, 100, 0));

        let params = PageParams {
            page: Some(3),
            limit: None,
        };
        assert_eq!(params.window(), (3, 12, 24));
    }

    #[test]
    fn page_response_rounds_total_pages_up() {
        let page = PageResponse::new(25, 1, 12, Vec::<u8>::new());
        assert_eq!(page.total_pages, 3);
    }
}
