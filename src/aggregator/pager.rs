/// Page bookkeeping for incremental category and search loading.
///
/// Pages are 1-based. `begin_next` refuses to start a fetch while one is in
/// flight or once the last page has been seen; `fail` hands the page number
/// back so the same page is requested again next time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    is_last_page: bool,
    is_loading: bool,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    pub fn new() -> Self {
        Self {
            page: 1,
            is_last_page: false,
            is_loading: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Starts over at page 1 and marks the first fetch as in flight.
    pub fn reset(&mut self) -> u32 {
        self.page = 1;
        self.is_last_page = false;
        self.is_loading = true;
        self.page
    }

    /// Returns the page to fetch next, or `None` when nothing should be fetched.
    pub fn begin_next(&mut self) -> Option<u32> {
        if self.is_last_page || self.is_loading {
            return None;
        }
        self.page += 1;
        self.is_loading = true;
        Some(self.page)
    }

    /// Records a search page; `start` and `num_found` come from the response.
    pub fn complete(&mut self, returned: usize, start: u64, num_found: u64) {
        self.is_loading = false;
        self.is_last_page = returned == 0 || start + returned as u64 >= num_found;
    }

    /// Records a category page, which carries no totals.
    pub fn complete_items(&mut self, returned: usize) {
        self.is_loading = false;
        self.is_last_page = returned == 0;
    }

    /// Records a failed fetch. A failed follow-up page rolls the counter back.
    pub fn fail(&mut self) {
        self.is_loading = false;
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Stops paging entirely, e.g. when the query was blank.
    pub fn finish(&mut self) {
        self.is_loading = false;
        self.is_last_page = true;
    }
}
