pub mod courses;
pub mod room;

use anyhow::Result;
use campusfeed_client::{CampusClient, DEFAULT_BASE_URL, DEFAULT_BASIC_BASE_URL};
use campusfeed_core::Course;

use crate::config::GlobalConfig;

pub(crate) fn build_client(config: &GlobalConfig, basic_token: String) -> Result<CampusClient> {
    let mut client = CampusClient::new(config.token()?, basic_token)?;
    if config.base_url.is_some() || config.basic_base_url.is_some() {
        client = client.with_base_urls(
            config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            config
                .basic_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASIC_BASE_URL.to_string()),
        );
    }
    Ok(client)
}

pub(crate) fn print_courses(courses: &[Course], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(courses)?);
        return Ok(());
    }

    for course in courses {
        println!("{} [{}] (id {})", course.title, course.slug, course.course_id);
        if let Some(main) = course.contacts.iter().find(|c| c.main_contact) {
            println!("  contact: {} {} <{}>", main.first_name, main.last_name, main.email);
        }
        for event in &course.events {
            println!(
                "  {} - {}  {}",
                event.start.format("%Y-%m-%d %H:%M"),
                event.end.format("%H:%M"),
                event.room
            );
        }
    }
    Ok(())
}
