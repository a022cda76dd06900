use crate::mock::{Event, ManualClock, client, response, settle};
use tsfeed::network::application::thingspeak::config::USER_AGENT;
use tsfeed::{Error, Status};

const LAST_FEED: &str = r#"{"created_at":"2024-05-01T10:00:00Z","entry_id":981,"field1":"10","field2":"warm","field3":"20.25","latitude":"51.50","longitude":"-0.12","elevation":"35","status":"all good"}"#;

#[test]
fn read_field_requests_the_last_value() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_string_field(99, 3, None).unwrap();
    let expected = format!(
        "GET /channels/99/fields/3/last HTTP/1.1\r\n\
         Host: api.thingspeak.com\r\n\
         User-Agent: {}\r\n\
         \r\n",
        USER_AGENT
    );
    assert_eq!(client.transport().sent_text(), expected);

    client.transport_mut().deliver(&response("200 OK", "hello"));
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Ok);
    assert_eq!(client.handler().events, [Event::ReadString("hello".into())]);
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn read_key_goes_in_a_header() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_string_field(99, 1, Some("READKEY")).unwrap();
    assert!(
        client
            .transport()
            .sent_text()
            .contains("X-THINGSPEAKAPIKEY: READKEY\r\n")
    );
}

#[test]
fn unknown_channel_reads_empty() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_string_field(99, 3, None).unwrap();
    client
        .transport_mut()
        .deliver(&response("404 Not Found", "-1"));
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Http(404));
    assert_eq!(client.handler().events, [Event::ReadString(String::new())]);
    assert_eq!(client.transport().unread(), 0);
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn numeric_reads_convert_the_body() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_float_field(1, 2, None).unwrap();
    client.transport_mut().deliver(&response("200 OK", "-12.75"));
    settle(&mut client);

    client.read_long_field(1, 2, None).unwrap();
    client
        .transport_mut()
        .deliver(&response("200 OK", "9000000000"));
    settle(&mut client);

    client.read_int_field(1, 2, None).unwrap();
    client
        .transport_mut()
        .deliver(&response("200 OK", "9000000000"));
    settle(&mut client);

    client.read_int_field(1, 2, None).unwrap();
    client.transport_mut().deliver(&response("200 OK", "warm"));
    settle(&mut client);

    assert_eq!(
        client.handler().events,
        [
            Event::ReadFloat(-12.75),
            Event::ReadLong(9_000_000_000),
            Event::ReadInt(i32::MAX),
            Event::ReadInt(0),
        ]
    );
}

#[test]
fn failed_numeric_read_yields_zero() {
    let clock = ManualClock::default();
    let mut client = client(&clock);
    client.transport_mut().refuse_connect = true;

    client.read_float_field(1, 2, None).unwrap();
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Failed(Error::ConnectFailed));
    assert_eq!(client.handler().events, [Event::ReadFloat(0.0)]);
}

#[test]
fn invalid_field_read_never_connects() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_string_field(99, 9, None).unwrap();
    settle(&mut client);

    assert_eq!(
        client.last_status(),
        Status::Failed(Error::InvalidFieldNumber)
    );
    assert_eq!(client.handler().events, [Event::ReadString(String::new())]);
    assert_eq!(client.transport().connects, 0);
}

#[test]
fn earlier_bodies_do_not_leak_into_failed_reads() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_string_field(99, 1, None).unwrap();
    client.transport_mut().deliver(&response("200 OK", "first"));
    settle(&mut client);

    client.read_string_field(99, 0, None).unwrap();
    settle(&mut client);

    client.read_raw(99, "/feeds.json", None).unwrap();
    client
        .transport_mut()
        .deliver(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n");
    settle(&mut client);

    assert_eq!(
        client.handler().events,
        [
            Event::ReadString("first".into()),
            Event::ReadString(String::new()),
            Event::ReadRaw(String::new()),
        ]
    );
    assert_eq!(client.last_status(), Status::Failed(Error::BadResponse));
}

#[test]
fn read_raw_appends_the_suffix() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client
        .read_raw(4242, "/feeds.json?results=2", Some("RK"))
        .unwrap();
    assert!(
        client
            .transport()
            .sent_text()
            .starts_with("GET /channels/4242/feeds.json?results=2 HTTP/1.1\r\n")
    );

    client.transport_mut().deliver(&response("200 OK", "{\"feeds\":[]}"));
    settle(&mut client);
    assert_eq!(
        client.handler().events,
        [Event::ReadRaw("{\"feeds\":[]}".into())]
    );
}

#[test]
fn read_status_extracts_one_key() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_status(12, None).unwrap();
    assert!(
        client
            .transport()
            .sent_text()
            .starts_with("GET /channels/12/feeds/last.txt?status=true HTTP/1.1\r\n")
    );
    client.transport_mut().deliver(&response("200 OK", LAST_FEED));
    settle(&mut client);

    client.read_status(12, None).unwrap();
    client.transport_mut().deliver(&response("200 OK", "-1"));
    settle(&mut client);

    client.read_status(12, None).unwrap();
    client
        .transport_mut()
        .deliver(&response("400 Bad Request", LAST_FEED));
    settle(&mut client);

    assert_eq!(
        client.handler().events,
        [
            Event::ReadStatus("all good".into()),
            Event::ReadStatus(String::new()),
            Event::ReadStatus(String::new()),
        ]
    );
}

#[test]
fn read_created_at_extracts_the_timestamp() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_created_at(12, Some("RK")).unwrap();
    assert!(
        client
            .transport()
            .sent_text()
            .starts_with("GET /channels/12/feeds/last.txt HTTP/1.1\r\n")
    );
    client.transport_mut().deliver(&response("200 OK", LAST_FEED));
    settle(&mut client);

    assert_eq!(
        client.handler().events,
        [Event::ReadCreatedAt("2024-05-01T10:00:00Z".into())]
    );
}

#[test]
fn read_multiple_fields_fills_the_snapshot() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_multiple_fields(12, None).unwrap();
    assert!(client.transport().sent_text().starts_with(
        "GET /channels/12/feeds/last.txt?status=true&location=true HTTP/1.1\r\n"
    ));
    client.transport_mut().deliver(&response("200 OK", LAST_FEED));
    settle(&mut client);

    assert_eq!(
        client.handler().events,
        [Event::ReadMultipleFields(Status::Ok)]
    );
    let feed = client.feed();
    assert_eq!(feed.field_as_string(1), "10");
    assert_eq!(feed.field_as_string(2), "warm");
    assert_eq!(feed.field_as_f32(3), 20.25);
    assert_eq!(feed.field_as_i64(1), 10);
    assert_eq!(feed.field_as_i32(2), 0);
    assert_eq!(feed.field_as_string(4), "");
    assert_eq!(feed.field_as_string(9), "");
    assert_eq!(feed.status(), "all good");
    assert_eq!(feed.latitude(), "51.50");
    assert_eq!(feed.longitude(), "-0.12");
    assert_eq!(feed.elevation(), "35");
    assert_eq!(feed.created_at(), "2024-05-01T10:00:00Z");
}

#[test]
fn failed_multi_read_keeps_the_previous_snapshot() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.read_multiple_fields(12, None).unwrap();
    client.transport_mut().deliver(&response("200 OK", LAST_FEED));
    settle(&mut client);
    let before = client.feed().clone();

    client.read_multiple_fields(12, None).unwrap();
    clock.advance(5_001);
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Failed(Error::Timeout));
    assert_eq!(client.feed(), &before);
    assert_eq!(
        client.handler().events.last(),
        Some(&Event::ReadMultipleFields(Status::Failed(Error::Timeout)))
    );
}
