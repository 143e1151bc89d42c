//! HTTP client for the scheduling service's XML feeds.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use campusfeed_core::config::FilterConfig;
use campusfeed_core::contacts::{self, CourseExport};
use campusfeed_core::date_range::DateRange;
use campusfeed_core::{group, record, xcal};
use campusfeed_core::{CampusError, CampusResult, ContactPerson, Course};

use crate::cache::FetchCache;

/// Webservice root for the XML feeds.
pub const DEFAULT_BASE_URL: &str = "https://campus.tum.de/tumonlinej/ws/webservice_v1.0/";
/// Root of the older "basic" webservice the course search lives on. The
/// endpoint name is appended directly, dot included.
pub const DEFAULT_BASIC_BASE_URL: &str = "https://campus.tum.de/tumonline/wbservicesbasic.";

/// Organization unit ids of the deployment this client is used with.
pub const ORG_UNIT_INFORMATICS: u32 = 14189;
pub const ORG_UNIT_MATHEMATICS: u32 = 14178;
pub const ORG_UNIT_PHYSICS: u32 = 14179;

const CACHE_TTL: Duration = Duration::from_secs(60);
const CACHE_MAX_ENTRIES: usize = 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent string for feed requests.
const USER_AGENT: &str = concat!("campusfeed/", env!("CARGO_PKG_VERSION"));

/// A failed per-course contact enrichment. Non-fatal: the batch carries on
/// and already-enriched courses keep their contacts.
#[derive(Debug)]
pub struct EnrichmentFailure {
    pub course_id: u32,
    pub error: CampusError,
}

/// Client for the scheduling service, with a TTL cache in front of every
/// outbound fetch.
pub struct CampusClient {
    token: String,
    basic_token: String,
    base_url: String,
    basic_base_url: String,
    http: Client,
    cache: FetchCache,
}

impl CampusClient {
    /// Create a client with the service tokens. `basic_token` authenticates
    /// the course search; pass an empty string when only the calendar feeds
    /// are used.
    pub fn new(token: impl Into<String>, basic_token: impl Into<String>) -> CampusResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CampusError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(CampusClient {
            token: token.into(),
            basic_token: basic_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            basic_base_url: DEFAULT_BASIC_BASE_URL.to_string(),
            http,
            cache: FetchCache::new(CACHE_TTL, CACHE_MAX_ENTRIES),
        })
    }

    /// Override the feed roots, e.g. for another campus instance.
    pub fn with_base_urls(
        mut self,
        base_url: impl Into<String>,
        basic_base_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self.basic_base_url = basic_base_url.into();
        self
    }

    /// Lecture courses of an organization unit within the date window.
    ///
    /// Fetches the organization's calendar feed through the cache, filters
    /// it to confirmed lectures in known rooms, groups the occurrences into
    /// courses and loads each course's contacts. Enrichment failures are
    /// returned alongside the courses, not raised.
    pub async fn org_courses(
        &self,
        org_unit: u32,
        range: &DateRange,
        config: &FilterConfig,
    ) -> CampusResult<(Vec<Course>, Vec<EnrichmentFailure>)> {
        let url = self.org_courses_url(org_unit, range)?;
        let key = format!("orgcourses{org_unit}");
        let bytes = self.cache.get_or_fetch(&key, || self.fetch(url)).await?;
        let text = feed_text(&bytes)?;

        let mut entries = xcal::filter_entries(xcal::parse_calendar(text)?, config);
        xcal::sort_entries(&mut entries);
        let courses = group::group_by_course(&entries);
        Ok(self.load_course_contacts(courses, config).await)
    }

    /// Lecture schedule of a single room.
    ///
    /// The attribute-bag feed is narrowed to confirmed lecture occurrences,
    /// grouped by title, and each group is resolved to a course id with
    /// contacts through the course search. Courses the search cannot resolve
    /// are returned without id or contacts.
    pub async fn room_schedule(
        &self,
        room_id: u32,
        semester: &str,
        range: &DateRange,
        config: &FilterConfig,
    ) -> CampusResult<Vec<Course>> {
        let url = self.room_schedule_url(room_id, range)?;
        let key = format!("roomschedule{room_id}");
        let bytes = self.cache.get_or_fetch(&key, || self.fetch(url)).await?;
        let text = feed_text(&bytes)?;

        let events = record::parse_room_schedule(text)?;
        let events = record::filter_by_attr(events, "eventTypeID", "LV");
        let events = record::filter_by_attr(events, "courseType", "VO");
        let events = record::filter_by_attr(events, "status", "fix");

        let mut courses = group::group_by_title(&events, &room_id.to_string());
        for course in &mut courses {
            match self.resolve_course(&course.title, semester, config).await {
                Ok((course_id, contacts)) => {
                    course.course_id = course_id;
                    course.contacts = contacts;
                }
                Err(error) => {
                    warn!(title = %course.title, %error, "course search failed");
                }
            }
        }
        Ok(courses)
    }

    /// Load contacts for each course from the course-export feed, one fetch
    /// per course. A failing course is reported and skipped; completed
    /// courses keep their results.
    pub async fn load_course_contacts(
        &self,
        mut courses: Vec<Course>,
        config: &FilterConfig,
    ) -> (Vec<Course>, Vec<EnrichmentFailure>) {
        let mut failures = Vec::new();
        for course in &mut courses {
            match self.course_export(course.course_id).await {
                Ok(export) => {
                    course.contacts =
                        contacts::contacts_from_export(&export, &config.lead_role_keywords);
                }
                Err(error) => {
                    warn!(course_id = course.course_id, %error, "contact enrichment failed");
                    failures.push(EnrichmentFailure {
                        course_id: course.course_id,
                        error,
                    });
                }
            }
        }
        (courses, failures)
    }

    /// Fetch and parse one course-export record.
    pub async fn course_export(&self, course_id: u32) -> CampusResult<CourseExport> {
        let url = self.course_export_url(course_id)?;
        let key = format!("courseexport{course_id}");
        let bytes = self.cache.get_or_fetch(&key, || self.fetch(url)).await?;
        contacts::parse_course_export(feed_text(&bytes)?)
    }

    /// Resolve a grouped title to its course id and contacts via the search
    /// feed. Every candidate row's export title must equal the grouped title
    /// exactly; rows that fail the cross-check are skipped.
    async fn resolve_course(
        &self,
        title: &str,
        semester: &str,
        config: &FilterConfig,
    ) -> CampusResult<(u32, Vec<ContactPerson>)> {
        let search = contacts::search_title(title);
        let url = self.course_search_url(&search, semester)?;
        let bytes = self.fetch(url).await?;
        let rows = contacts::parse_search_rows(feed_text(&bytes)?)?;

        for row in rows.iter().filter(|row| contacts::is_lecture_row(row)) {
            let Ok(course_id) = row.course_id.parse::<u32>() else {
                continue;
            };
            let export = match self.course_export(course_id).await {
                Ok(export) => export,
                Err(error) => {
                    warn!(course_id, %error, "course export failed");
                    continue;
                }
            };
            if export.title != title {
                continue;
            }
            let contacts = contacts::contacts_from_export(&export, &config.lead_role_keywords);
            return Ok((course_id, contacts));
        }
        Err(CampusError::CourseLookup(title.to_string()))
    }

    async fn fetch(&self, url: Url) -> CampusResult<Vec<u8>> {
        debug!(%url, "fetching feed");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CampusError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| CampusError::Transport(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CampusError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn org_courses_url(&self, org_unit: u32, range: &DateRange) -> CampusResult<Url> {
        let mut url = self.endpoint("xcal/organization/courses/xml")?;
        url.query_pairs_mut()
            .append_pair("token", &self.token)
            .append_pair("timeMode", "absolute")
            .append_pair("orgUnitID", &org_unit.to_string())
            .append_pair("fromDate", &range.from_param())
            .append_pair("untilDate", &range.until_param());
        Ok(url)
    }

    fn room_schedule_url(&self, room_id: u32, range: &DateRange) -> CampusResult<Url> {
        let mut url = self.endpoint("rdm/room/schedule/xml")?;
        url.query_pairs_mut()
            .append_pair("token", &self.token)
            .append_pair("timeMode", "absolute")
            .append_pair("roomID", &room_id.to_string())
            .append_pair("buildingCode", "")
            .append_pair("fromDate", &range.from_param())
            .append_pair("untilDate", &range.until_param());
        Ok(url)
    }

    fn course_export_url(&self, course_id: u32) -> CampusResult<Url> {
        let mut url = self.endpoint("cdm/course/xml")?;
        url.query_pairs_mut()
            .append_pair("token", &self.token)
            .append_pair("courseID", &course_id.to_string());
        Ok(url)
    }

    fn course_search_url(&self, search: &str, semester: &str) -> CampusResult<Url> {
        let mut url = Url::parse(&format!("{}veranstaltungenSuche", self.basic_base_url))
            .map_err(|e| CampusError::Config(format!("invalid basic base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("pToken", &self.basic_token)
            .append_pair("pSuche", search)
            .append_pair("pSemester", semester);
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> CampusResult<Url> {
        Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| CampusError::Config(format!("invalid base URL: {e}")))
    }
}

fn feed_text(bytes: &[u8]) -> CampusResult<&str> {
    Ok(std::str::from_utf8(bytes)?)
}
