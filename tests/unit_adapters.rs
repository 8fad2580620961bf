// Unit tests for adapter mapping rules.
//
// Each adapter's pure mapping function is fed inline JSON/XML fixtures
// shaped like the real API responses — no network access.

use chrono::{TimeZone, Utc};

use timeline::activity::{Activity, Platform};
use timeline::adapters::bluesky::{map_posts, FeedPost};
use timeline::adapters::github::{map_events, GitHubEvent};
use timeline::adapters::mastodon::{map_statuses, Status, MAX_CONTENT_CHARS};
use timeline::adapters::rss::{parse_feed, MAX_ENTRIES};
use timeline::adapters::spotify::{map_play_history, RecentlyPlayed, MAX_TRACKS};
use timeline::adapters::twitch::{map_videos, HelixResponse, Video};
use timeline::adapters::youtube::{map_search_results, SearchResponse};

fn assert_markup_free(activities: &[Activity]) {
    for a in activities {
        assert!(
            !a.content.contains('<') && !a.content.contains('>'),
            "markup leaked into content: {:?}",
            a.content
        );
    }
}

// ============================================================
// GitHub
// ============================================================

const GITHUB_EVENTS: &str = r#"[
    {
        "id": "1",
        "type": "PushEvent",
        "repo": {"id": 1, "name": "octocat/hello", "url": "https://api.github.com/repos/octocat/hello"},
        "payload": {"size": 3, "head": "abc123", "commits": [{}, {}, {}]},
        "created_at": "2024-01-10T08:00:00Z"
    },
    {
        "id": "2",
        "type": "CreateEvent",
        "repo": {"id": 2, "name": "octocat/new-thing"},
        "payload": {"ref": null, "ref_type": "repository"},
        "created_at": "2024-01-09T08:00:00Z"
    },
    {
        "id": "3",
        "type": "CreateEvent",
        "repo": {"id": 1, "name": "octocat/hello"},
        "payload": {"ref": "feature-x", "ref_type": "branch"},
        "created_at": "2024-01-09T07:00:00Z"
    },
    {
        "id": "4",
        "type": "WatchEvent",
        "repo": {"id": 3, "name": "rust-lang/rust"},
        "payload": {"action": "started"},
        "created_at": "2024-01-08T08:00:00Z"
    },
    {
        "id": "5",
        "type": "IssueCommentEvent",
        "repo": {"id": 1, "name": "octocat/hello"},
        "payload": {"action": "created"},
        "created_at": "2024-01-08T07:00:00Z"
    }
]"#;

#[test]
fn github_keeps_push_create_repository_and_star() {
    let events: Vec<GitHubEvent> = serde_json::from_str(GITHUB_EVENTS).unwrap();
    let activities = map_events(&events);

    let contents: Vec<&str> = activities.iter().map(|a| a.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "pushed 3 commits to octocat/hello",
            "created repository octocat/new-thing",
            "starred rust-lang/rust",
        ]
    );
    assert!(activities.iter().all(|a| a.platform == Platform::GitHub));
}

#[test]
fn github_drops_branch_creation() {
    let events: Vec<GitHubEvent> = serde_json::from_str(GITHUB_EVENTS).unwrap();
    let activities = map_events(&events);
    assert!(activities.iter().all(|a| !a.content.contains("feature-x")));
    assert!(activities
        .iter()
        .all(|a| a.timestamp != Utc.with_ymd_and_hms(2024, 1, 9, 7, 0, 0).unwrap()));
}

#[test]
fn github_push_links_to_head_commit() {
    let events: Vec<GitHubEvent> = serde_json::from_str(GITHUB_EVENTS).unwrap();
    let activities = map_events(&events);
    assert_eq!(activities[0].url, "https://github.com/octocat/hello/commit/abc123");
    assert_eq!(activities[1].url, "https://github.com/octocat/new-thing");
}

#[test]
fn github_push_without_commit_count() {
    let json = r#"[{
        "type": "PushEvent",
        "repo": {"name": "octocat/hello"},
        "payload": {"ref": "refs/heads/main"},
        "created_at": "2024-01-10T08:00:00Z"
    }]"#;
    let events: Vec<GitHubEvent> = serde_json::from_str(json).unwrap();
    let activities = map_events(&events);
    assert_eq!(activities[0].content, "pushed to octocat/hello");
    assert_eq!(activities[0].url, "https://github.com/octocat/hello");
}

#[test]
fn github_single_commit_is_singular() {
    let json = r#"[{
        "type": "PushEvent",
        "repo": {"name": "octocat/hello"},
        "payload": {"size": 1},
        "created_at": "2024-01-10T08:00:00Z"
    }]"#;
    let events: Vec<GitHubEvent> = serde_json::from_str(json).unwrap();
    assert_eq!(map_events(&events)[0].content, "pushed 1 commit to octocat/hello");
}

// ============================================================
// YouTube
// ============================================================

#[test]
fn youtube_maps_videos_and_decodes_titles() {
    let json = r#"{
        "kind": "youtube#searchListResponse",
        "items": [
            {
                "id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"},
                "snippet": {
                    "publishedAt": "2024-01-10T12:00:00Z",
                    "title": "Tom &amp; Jerry&#39;s &lt;b&gt;big&lt;/b&gt; day",
                    "channelId": "UCxyz"
                }
            },
            {
                "id": {"kind": "youtube#channel", "channelId": "UCxyz"},
                "snippet": {"publishedAt": "2024-01-09T12:00:00Z", "title": "Channel"}
            }
        ]
    }"#;
    let response: SearchResponse = serde_json::from_str(json).unwrap();
    let activities = map_search_results(&response);

    assert_eq!(activities.len(), 1);
    assert_eq!(
        activities[0].content,
        "published a video: Tom & Jerry's big day"
    );
    assert_eq!(activities[0].url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert_markup_free(&activities);
}

#[test]
fn youtube_empty_response() {
    let response: SearchResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
    assert!(map_search_results(&response).is_empty());
    let response: SearchResponse = serde_json::from_str("{}").unwrap();
    assert!(map_search_results(&response).is_empty());
}

// ============================================================
// Mastodon
// ============================================================

#[test]
fn mastodon_excludes_reblogs_and_replies_and_strips_html() {
    let json = r#"[
        {
            "id": "1",
            "created_at": "2024-01-10T10:00:00.000Z",
            "content": "<p>Hello <a href=\"https://example.com\">world</a><br />again</p>",
            "url": "https://mastodon.social/@me/1",
            "uri": "https://mastodon.social/users/me/statuses/1",
            "reblog": null,
            "in_reply_to_id": null
        },
        {
            "id": "2",
            "created_at": "2024-01-10T09:00:00.000Z",
            "content": "",
            "url": null,
            "uri": "https://mastodon.social/users/me/statuses/2/activity",
            "reblog": {"id": "99", "content": "<p>someone else</p>"},
            "in_reply_to_id": null
        },
        {
            "id": "3",
            "created_at": "2024-01-10T08:00:00.000Z",
            "content": "<p>@friend agreed</p>",
            "url": "https://mastodon.social/@me/3",
            "uri": "https://mastodon.social/users/me/statuses/3",
            "reblog": null,
            "in_reply_to_id": "42"
        }
    ]"#;
    let statuses: Vec<Status> = serde_json::from_str(json).unwrap();
    let activities = map_statuses(&statuses);

    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].content, "posted: Hello world again");
    assert_eq!(activities[0].url, "https://mastodon.social/@me/1");
    assert_markup_free(&activities);
}

#[test]
fn mastodon_truncates_long_statuses() {
    let long_text = "あ".repeat(150);
    let json = format!(
        r#"[{{"id": "1", "created_at": "2024-01-10T10:00:00Z", "content": "<p>{long_text}</p>",
            "url": null, "uri": "https://example.social/1", "reblog": null, "in_reply_to_id": null}}]"#
    );
    let statuses: Vec<Status> = serde_json::from_str(&json).unwrap();
    let activities = map_statuses(&statuses);

    let expected = format!("posted: {}...", "あ".repeat(MAX_CONTENT_CHARS));
    assert_eq!(activities[0].content, expected);
    // url falls back to uri
    assert_eq!(activities[0].url, "https://example.social/1");
}

// ============================================================
// Bluesky
// ============================================================

fn feed_post(rkey: &str, text: &str, is_repost: bool, is_reply: bool) -> FeedPost {
    FeedPost {
        uri: format!("at://did:plc:me/app.bsky.feed.post/{rkey}"),
        text: text.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
        is_repost,
        is_reply,
    }
}

#[test]
fn bluesky_excludes_reposts_and_replies() {
    let posts = vec![
        feed_post("own", "my own post about <rust>", false, false),
        feed_post("rp", "someone else's post", true, false),
        feed_post("re", "a reply", false, true),
    ];
    let activities = map_posts("me.bsky.social", &posts);

    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].content, "posted: my own post about rust");
    assert_eq!(
        activities[0].url,
        "https://bsky.app/profile/me.bsky.social/post/own"
    );
    assert_markup_free(&activities);
}

// ============================================================
// Spotify
// ============================================================

fn play(id: &str, name: &str, played_at: &str) -> String {
    format!(
        r#"{{"track": {{"id": "{id}", "name": "{name}",
            "artists": [{{"name": "Artist A"}}, {{"name": "Artist B"}}],
            "external_urls": {{"spotify": "https://open.spotify.com/track/{id}"}}}},
          "played_at": "{played_at}"}}"#
    )
}

#[test]
fn spotify_dedups_by_track_id_keeping_first() {
    let json = format!(
        r#"{{"items": [{}, {}, {}, {}]}}"#,
        play("t1", "First Play", "2024-01-10T12:00:00.000Z"),
        play("t2", "Other Song", "2024-01-10T11:00:00.000Z"),
        play("t1", "Replayed Earlier", "2024-01-10T10:00:00.000Z"),
        play("t3", "Third", "2024-01-10T09:00:00.000Z"),
    );
    let history: RecentlyPlayed = serde_json::from_str(&json).unwrap();
    let activities = map_play_history(&history.items);

    assert_eq!(activities.len(), 3);
    assert_eq!(activities[0].content, "listened to First Play by Artist A, Artist B");
    assert_eq!(
        activities[0].timestamp,
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    );
    assert_eq!(activities[0].url, "https://open.spotify.com/track/t1");
    assert!(activities.iter().all(|a| !a.content.contains("Replayed Earlier")));
}

#[test]
fn spotify_caps_distinct_tracks() {
    let plays: Vec<String> = (0..25)
        .map(|i| play(&format!("t{i}"), "Song", "2024-01-10T12:00:00Z"))
        .collect();
    let json = format!(r#"{{"items": [{}]}}"#, plays.join(","));
    let history: RecentlyPlayed = serde_json::from_str(&json).unwrap();
    assert_eq!(map_play_history(&history.items).len(), MAX_TRACKS);
}

#[test]
fn spotify_local_files_without_id_are_kept() {
    let json = r#"{"items": [
        {"track": {"id": null, "name": "Local Demo", "artists": []}, "played_at": "2024-01-10T12:00:00Z"},
        {"track": {"id": null, "name": "Local Demo", "artists": []}, "played_at": "2024-01-10T11:00:00Z"}
    ]}"#;
    let history: RecentlyPlayed = serde_json::from_str(json).unwrap();
    let activities = map_play_history(&history.items);
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].content, "listened to Local Demo");
    assert_eq!(activities[0].url, "https://open.spotify.com/");
}

// ============================================================
// Twitch
// ============================================================

#[test]
fn twitch_maps_archived_broadcasts() {
    let json = r#"{
        "data": [
            {
                "id": "335921245",
                "user_id": "141981764",
                "title": "Building a <timeline> in Rust",
                "url": "https://www.twitch.tv/videos/335921245",
                "created_at": "2024-01-10T20:00:00Z",
                "published_at": "2024-01-10T20:00:00Z",
                "type": "archive"
            }
        ],
        "pagination": {}
    }"#;
    let response: HelixResponse<Video> = serde_json::from_str(json).unwrap();
    let activities = map_videos(&response.data);

    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].content, "streamed: Building a timeline in Rust");
    assert_eq!(activities[0].url, "https://www.twitch.tv/videos/335921245");
    assert_markup_free(&activities);
}

// ============================================================
// RSS-based platforms
// ============================================================

/// RSS document with `count` items dated Jan 1, Jan 2, ... 2024 at 09:00 JST.
fn rss_with_items(count: usize) -> String {
    const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    let items: String = (0..count)
        .map(|i| {
            format!(
                "<item><title>Post {i}</title><link>https://note.com/writer/n/n{i}</link>\
                 <pubDate>{}, {:02} Jan 2024 09:00:00 +0900</pubDate>\
                 <description><![CDATA[<p>body {i}</p>]]></description></item>",
                WEEKDAYS[i % 7],
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>writer</title><link>https://note.com/writer</link>
<description>feed</description>{items}</channel></rss>"#
    )
}

#[test]
fn rss_keeps_most_recent_entries() {
    let xml = rss_with_items(8);
    let activities = parse_feed(Platform::Note, xml.as_bytes()).unwrap();

    assert_eq!(activities.len(), MAX_ENTRIES);
    // Newest first: item 7 is dated Jan 8
    assert_eq!(activities[0].content, "published an article: Post 7");
    assert_eq!(activities[0].url, "https://note.com/writer/n/n7");
    assert_eq!(
        activities[0].timestamp,
        Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()
    );
    assert!(activities.iter().all(|a| a.platform == Platform::Note));
}

#[test]
fn rss_templates_per_platform() {
    let xml = rss_with_items(1);
    let vimeo = parse_feed(Platform::Vimeo, xml.as_bytes()).unwrap();
    let soundcloud = parse_feed(Platform::SoundCloud, xml.as_bytes()).unwrap();
    assert_eq!(vimeo[0].content, "uploaded a video: Post 0");
    assert_eq!(soundcloud[0].content, "uploaded a track: Post 0");
}

#[test]
fn tumblr_untitled_posts_use_stripped_summary() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>blog</title><link>https://blog.tumblr.com/</link>
<description>blog</description>
<item><description>&lt;p&gt;A &lt;b&gt;photo&lt;/b&gt; post&lt;/p&gt;</description>
<link>https://blog.tumblr.com/post/1</link><guid>https://blog.tumblr.com/post/1</guid>
<pubDate>Wed, 10 Jan 2024 09:00:00 +0000</pubDate></item>
</channel></rss>"#;
    let activities = parse_feed(Platform::Tumblr, xml.as_bytes()).unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].content, "posted: A photo post");
    assert_markup_free(&activities);
}

#[test]
fn atom_feeds_parse_too() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>uploads</title>
  <id>urn:uuid:feed</id>
  <updated>2024-01-10T00:00:00Z</updated>
  <entry>
    <title>Clip</title>
    <id>urn:uuid:clip</id>
    <link href="https://vimeo.com/123"/>
    <updated>2024-01-10T00:00:00Z</updated>
  </entry>
</feed>"#;
    let activities = parse_feed(Platform::Vimeo, xml.as_bytes()).unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].url, "https://vimeo.com/123");
}

#[test]
fn rss_undated_entries_are_skipped() {
    let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>
<link>https://x</link><description>d</description>
<item><title>No date</title><link>https://x/1</link></item></channel></rss>"#;
    assert!(parse_feed(Platform::Note, xml.as_bytes()).unwrap().is_empty());
}

#[test]
fn rss_garbage_is_an_error() {
    assert!(parse_feed(Platform::Note, b"this is not a feed").is_err());
}
