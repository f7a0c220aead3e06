//! Program entries and schedule XML parsing
//!
//! The daily schedule is `radiko/stations/station/progs/prog`; each `prog`
//! carries its times as attributes and its text as child elements.

use super::ScheduleError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const WIRE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// One broadcastable program from the daily schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEntry {
    pub station_id: String,

    /// Title with spaces replaced by underscores
    pub title: String,

    pub info: Option<String>,

    pub description: Option<String>,

    /// Performer list with full-width commas replaced by ASCII commas
    pub performers: String,

    /// Start time as sent (`YYYYMMDDHHMMSS`)
    pub ft: String,

    /// End time as sent (`YYYYMMDDHHMMSS`)
    pub to: String,

    /// Local start label (`HHMM`, may exceed 2400 for late-night slots)
    pub ftl: String,

    /// Local end label
    pub tol: String,

    pub start: NaiveDateTime,

    pub end: NaiveDateTime,

    /// Duration in seconds
    pub duration_secs: u32,
}

#[derive(Debug, Deserialize)]
struct ScheduleDocument {
    #[serde(default)]
    stations: StationsXml,
}

#[derive(Debug, Default, Deserialize)]
struct StationsXml {
    #[serde(rename = "station", default)]
    stations: Vec<StationXml>,
}

#[derive(Debug, Deserialize)]
struct StationXml {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    progs: ProgsXml,
}

#[derive(Debug, Default, Deserialize)]
struct ProgsXml {
    #[serde(rename = "prog", default)]
    progs: Vec<ProgXml>,
}

#[derive(Debug, Deserialize)]
struct ProgXml {
    #[serde(rename = "@ft")]
    ft: String,
    #[serde(rename = "@to")]
    to: String,
    #[serde(rename = "@ftl", default)]
    ftl: String,
    #[serde(rename = "@tol", default)]
    tol: String,
    #[serde(rename = "@dur", default)]
    dur: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    pfm: Option<String>,
}

/// Empty or whitespace-only element text counts as absent
fn present(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn parse_wire_time(field: &str, value: &str) -> Result<NaiveDateTime, ScheduleError> {
    NaiveDateTime::parse_from_str(value.trim(), WIRE_TIME_FORMAT).map_err(|_| {
        ScheduleError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        }
    })
}

impl ProgXml {
    fn into_entry(self, station_id: &str) -> Result<Option<ProgramEntry>, ScheduleError> {
        let Some(performers) = present(self.pfm) else {
            return Ok(None);
        };

        let start = parse_wire_time("ft", &self.ft)?;
        let end = parse_wire_time("to", &self.to)?;
        let duration_secs = if self.dur.trim().is_empty() {
            (end - start).num_seconds().max(0) as u32
        } else {
            self.dur
                .trim()
                .parse()
                .map_err(|_| ScheduleError::InvalidField {
                    field: "dur".to_string(),
                    value: self.dur.clone(),
                })?
        };

        Ok(Some(ProgramEntry {
            station_id: station_id.to_string(),
            title: self.title.unwrap_or_default().replace(' ', "_"),
            info: present(self.info),
            description: present(self.desc),
            performers: performers.replace('，', ","),
            ft: self.ft,
            to: self.to,
            ftl: self.ftl,
            tol: self.tol,
            start,
            end,
            duration_secs,
        }))
    }
}

/// Parse a daily schedule document. Programs without performers are dropped.
pub fn parse_schedule(xml: &str) -> Result<Vec<ProgramEntry>, ScheduleError> {
    let document: ScheduleDocument =
        quick_xml::de::from_str(xml).map_err(|e| ScheduleError::Parse(e.to_string()))?;

    let mut entries = Vec::new();
    let mut dropped = 0usize;
    for station in document.stations.stations {
        for prog in station.progs.progs {
            match prog.into_entry(&station.id)? {
                Some(entry) => entries.push(entry),
                None => dropped += 1,
            }
        }
    }

    tracing::debug!(
        "Parsed {} programs ({} without performers dropped)",
        entries.len(),
        dropped
    );
    Ok(entries)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<radiko>
  <ttl>1800</ttl>
  <srvtime>1700000000</srvtime>
  <stations>
    <station id="TBS">
      <name>TBSラジオ</name>
      <progs>
        <date>20240105</date>
        <prog id="1" master_id="" ft="20240105050000" to="20240105053000" ftl="0500" tol="0530" dur="1800">
          <title>Morning News Flash</title>
          <url>https://example.com</url>
          <pfm>山田太郎，佐藤花子</pfm>
          <desc/>
          <info>&lt;b&gt;traffic&lt;/b&gt; and weather</info>
        </prog>
        <prog id="2" master_id="" ft="20240105053000" to="20240105060000" ftl="0530" tol="0600" dur="1800">
          <title>Filler</title>
          <pfm/>
          <desc>station break</desc>
          <info/>
        </prog>
      </progs>
    </station>
    <station id="QRR">
      <name>文化放送</name>
      <progs>
        <date>20240105</date>
        <prog id="3" master_id="" ft="20240106000000" to="20240106010000" ftl="2400" tol="2500" dur="3600">
          <title>Late Show</title>
          <pfm>中川緑</pfm>
          <desc>music talk</desc>
          <info></info>
        </prog>
      </progs>
    </station>
  </stations>
</radiko>"#;

    #[test]
    fn test_drops_entries_without_performers() {
        let entries = parse_schedule(SAMPLE).unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.title != "Filler"));
    }

    #[test]
    fn test_normalizes_text() {
        let entries = parse_schedule(SAMPLE).unwrap();
        let morning = &entries[0];

        assert_eq!(morning.station_id, "TBS");
        assert_eq!(morning.title, "Morning_News_Flash");
        assert_eq!(morning.performers, "山田太郎,佐藤花子");
        assert_eq!(morning.info.as_deref(), Some("<b>traffic</b> and weather"));
        assert_eq!(morning.description, None);
        assert_eq!(morning.duration_secs, 1800);
        assert_eq!(morning.ftl, "0500");
        assert_eq!(
            morning.start,
            NaiveDateTime::parse_from_str("20240105050000", WIRE_TIME_FORMAT).unwrap()
        );
    }

    #[test]
    fn test_empty_info_is_absent() {
        let entries = parse_schedule(SAMPLE).unwrap();
        let late = &entries[1];

        assert_eq!(late.station_id, "QRR");
        assert_eq!(late.info, None);
        assert_eq!(late.description.as_deref(), Some("music talk"));
    }

    #[test]
    fn test_invalid_start_time() {
        // hour 25 is not a valid wall-clock time
        let xml = SAMPLE.replace("20240106000000", "20240105250000");
        let err = parse_schedule(&xml).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidField { ref field, .. } if field == "ft"));
    }

    #[test]
    fn test_malformed_document() {
        let err = parse_schedule("<radiko><stations><station id=\"x\">").unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
    }
}
