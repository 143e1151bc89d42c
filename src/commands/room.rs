use anyhow::Result;
use campusfeed_core::date_range::DateRange;

use crate::config::GlobalConfig;

pub async fn run(
    config: &GlobalConfig,
    room: u32,
    semester: &str,
    range: DateRange,
    json: bool,
) -> Result<()> {
    let client = super::build_client(config, config.basic_token()?)?;
    let courses = client
        .room_schedule(room, semester, &range, &config.filter)
        .await?;
    super::print_courses(&courses, json)
}
