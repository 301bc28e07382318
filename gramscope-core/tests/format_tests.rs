// Tests for the entity formatters

use gramscope_core::format::{
    PostEnrichment, ProfileEnrichment, format_hashtag, format_igtv_node, format_igtv_video,
    format_place, format_post, format_post_detail, format_profile,
};
use gramscope_core::model::{PostRecord, RequestDebugInfo};
use gramscope_core::raw::RawNode;
use serde_json::{Value, json};

fn debug_info() -> RequestDebugInfo {
    RequestDebugInfo {
        request_id: "req-1".to_string(),
        url: "https://www.instagram.com/p/abc/".to_string(),
        loaded_url: None,
        method: "GET".to_string(),
        retry_count: 0,
        error_messages: vec![],
        status_code: Some(200),
    }
}

fn comment(text: &str, owner: Option<&str>) -> Value {
    match owner {
        Some(username) => json!({ "node": { "text": text, "owner": { "username": username } } }),
        None => json!({ "node": { "text": text } }),
    }
}

fn assert_minimal_post(post: &PostRecord) {
    assert_eq!(post.post_type, "Image");
    assert_eq!(post.short_code, None);
    assert_eq!(post.caption, "");
    assert!(post.hashtags.is_empty());
    assert!(post.mentions.is_empty());
    assert_eq!(post.url, None);
    assert_eq!(post.comments_count, None);
    assert!(post.latest_comments.is_empty());
    assert_eq!(post.dimensions_height, None);
    assert_eq!(post.dimensions_width, None);
    assert!(post.images.is_empty());
    assert_eq!(post.first_comment, None);
    assert_eq!(post.likes_count, None);
    assert_eq!(post.timestamp, None);
    assert_eq!(post.location_name, None);
    assert_eq!(post.location_id, None);
    assert_eq!(post.owner_full_name, None);
    assert_eq!(post.owner_username, None);
    assert_eq!(post.owner_id, None);
    assert_eq!(post.is_sponsored, None);
    assert_eq!(post.video_duration, None);
}

// ============================================================================
// Minimal Payload Tests
// ============================================================================

#[test]
fn test_format_post_minimal() {
    let node = json!({});
    let post = format_post(&RawNode::new(&node));
    assert_minimal_post(&post);
}

#[test]
fn test_format_post_minimal_serializes_every_field() {
    let node = json!({});
    let post = serde_json::to_value(format_post(&RawNode::new(&node))).unwrap();
    let fields = post.as_object().unwrap();

    for key in [
        "type",
        "shortCode",
        "caption",
        "hashtags",
        "mentions",
        "url",
        "commentsCount",
        "latestComments",
        "dimensionsHeight",
        "dimensionsWidth",
        "displayUrl",
        "images",
        "videoUrl",
        "id",
        "firstComment",
        "alt",
        "likesCount",
        "videoViewCount",
        "timestamp",
        "locationName",
        "locationId",
        "ownerFullName",
        "ownerUsername",
        "ownerId",
        "productType",
        "isSponsored",
        "videoDuration",
    ] {
        assert!(fields.contains_key(key), "missing field {}", key);
    }
    assert_eq!(fields["commentsCount"], Value::Null);
    assert_eq!(fields["latestComments"], json!([]));
}

#[test]
fn test_format_profile_minimal() {
    let node = json!({});
    let profile = format_profile(&RawNode::new(&node), ProfileEnrichment::default(), debug_info());

    assert_eq!(profile.id, None);
    assert_eq!(profile.followers_count, None);
    assert_eq!(profile.follows_count, None);
    assert_eq!(profile.igtv_video_count, None);
    assert!(profile.latest_igtv_videos.is_empty());
    assert_eq!(profile.posts_count, None);
    assert!(profile.latest_posts.is_empty());
    assert!(profile.following.is_empty());
    assert!(profile.followed_by.is_empty());
    assert_eq!(profile.has_public_story, None);

    let json = serde_json::to_value(&profile).unwrap();
    assert!(json.get("#debug").is_some());
    assert!(json.get("profilePicUrlHD").is_some());
}

#[test]
fn test_format_place_minimal() {
    let node = json!({});
    let place = format_place(&RawNode::new(&node), debug_info());

    assert_eq!(place.id, None);
    assert_eq!(place.lat, None);
    assert!(place.address.is_empty());
    assert_eq!(place.posts_count, None);
    assert!(place.top_posts.is_empty());
    assert!(place.latest_posts.is_empty());
}

#[test]
fn test_format_hashtag_minimal() {
    let node = json!({});
    let hashtag = format_hashtag(&RawNode::new(&node), debug_info());

    assert_eq!(hashtag.name, None);
    assert_eq!(hashtag.top_posts_only, None);
    assert_eq!(hashtag.posts_count, None);
    assert!(hashtag.top_posts.is_empty());
    assert!(hashtag.latest_posts.is_empty());
}

#[test]
fn test_format_post_detail_minimal() {
    let node = json!({});
    let detail = format_post_detail(&RawNode::new(&node), PostEnrichment::default(), debug_info());

    assert_minimal_post(&detail.post);
    assert_eq!(detail.caption_is_edited, None);
    assert_eq!(detail.display_resource_urls, None);
    assert_eq!(detail.child_posts, None);
    assert_eq!(detail.location_slug, None);
    assert_eq!(detail.is_advertisement, None);
    assert!(detail.tagged_users.is_empty());
    assert!(detail.liked_by.is_empty());
}

#[test]
fn test_format_igtv_video_minimal() {
    let edge = json!({ "node": {} });
    let video = format_igtv_video(&RawNode::new(&edge));

    assert_eq!(video.video_type, "Video");
    assert_eq!(video.caption, "");
    assert_eq!(video.likes_count, None);
    assert_eq!(video.comments_count, None);
    assert_eq!(video.video_duration, 0.0);
}

#[test]
fn test_igtv_edge_and_bare_node_agree() {
    let node = json!({ "shortcode": "tv1", "title": "Launch", "video_duration": 30.0 });
    let edge = json!({ "node": node.clone() });

    let from_node = format_igtv_node(&RawNode::new(&node));
    assert_eq!(from_node.short_code.as_deref(), Some("tv1"));
    assert_eq!(from_node.title.as_deref(), Some("Launch"));
    assert_eq!(from_node.video_duration, 30.0);
    assert_eq!(format_igtv_video(&RawNode::new(&edge)), from_node);
    assert_eq!(format_igtv_video(&RawNode::new(&node)), from_node);
}

// ============================================================================
// Post Field Tests
// ============================================================================

#[test]
fn test_comment_synonym_priority() {
    let node = json!({
        "edge_media_preview_comment": {
            "count": 1,
            "edges": [ comment("preview", Some("p")) ]
        },
        "edge_media_to_comment": {
            "count": 2,
            "edges": [ comment("primary-1", Some("a")), comment("primary-2", Some("b")) ]
        }
    });
    let post = format_post(&RawNode::new(&node));

    assert_eq!(post.comments_count, Some(2));
    let texts: Vec<_> = post
        .latest_comments
        .iter()
        .map(|c| c.text.clone().unwrap())
        .collect();
    assert_eq!(texts, vec!["primary-2", "primary-1"]);
}

#[test]
fn test_latest_comments_reversed_first_comment_unreversed() {
    let node = json!({
        "edge_media_to_parent_comment": {
            "count": 3,
            "edges": [ comment("c1", Some("u1")), comment("c2", None), comment("c3", Some("u3")) ]
        }
    });
    let post = format_post(&RawNode::new(&node));

    let texts: Vec<_> = post
        .latest_comments
        .iter()
        .map(|c| c.text.as_deref().unwrap())
        .collect();
    assert_eq!(texts, vec!["c3", "c2", "c1"]);
    assert_eq!(post.first_comment.as_deref(), Some("c1"));
    assert_eq!(post.latest_comments[1].owner_username, "");
    assert_eq!(post.latest_comments[0].owner_username, "u3");
}

#[test]
fn test_comment_count_without_edges() {
    let node = json!({ "edge_media_preview_comment": { "count": 40 } });
    let post = format_post(&RawNode::new(&node));

    assert_eq!(post.comments_count, Some(40));
    assert!(post.latest_comments.is_empty());
    assert_eq!(post.first_comment, None);
}

#[test]
fn test_likes_synonyms() {
    let preview = json!({ "edge_media_preview_like": { "count": 5 } });
    assert_eq!(format_post(&RawNode::new(&preview)).likes_count, Some(5));

    let both = json!({
        "edge_media_preview_like": { "count": 5 },
        "edge_liked_by": { "count": 9 }
    });
    assert_eq!(format_post(&RawNode::new(&both)).likes_count, Some(9));
}

#[test]
fn test_type_discriminator() {
    let image = json!({ "__typename": "GraphImage" });
    assert_eq!(format_post(&RawNode::new(&image)).post_type, "Image");

    let sidecar = json!({ "__typename": "GraphSidecar", "is_video": true });
    assert_eq!(format_post(&RawNode::new(&sidecar)).post_type, "Sidecar");

    let video = json!({ "is_video": true });
    assert_eq!(format_post(&RawNode::new(&video)).post_type, "Video");

    let not_video = json!({ "is_video": false });
    assert_eq!(format_post(&RawNode::new(&not_video)).post_type, "Image");

    let empty_typename = json!({ "__typename": "", "is_video": true });
    assert_eq!(format_post(&RawNode::new(&empty_typename)).post_type, "Video");
}

#[test]
fn test_caption_hashtags_and_mentions() {
    let node = json!({
        "edge_media_to_caption": {
            "edges": [
                { "node": { "text": "Hello @world #rust #rustlang" } },
                { "node": { "text": "ignored #second" } }
            ]
        }
    });
    let post = format_post(&RawNode::new(&node));

    assert_eq!(post.caption, "Hello @world #rust #rustlang");
    assert_eq!(post.hashtags, vec!["rust", "rustlang"]);
    assert_eq!(post.mentions, vec!["world"]);
}

#[test]
fn test_caption_empty_edges() {
    let node = json!({ "edge_media_to_caption": { "edges": [] } });
    assert_eq!(format_post(&RawNode::new(&node)).caption, "");
}

#[test]
fn test_timestamp_iso() {
    let node = json!({ "taken_at_timestamp": 1577836800 });
    assert_eq!(
        format_post(&RawNode::new(&node)).timestamp.as_deref(),
        Some("2020-01-01T00:00:00.000Z")
    );

    let as_string = json!({ "taken_at_timestamp": "1577836801" });
    assert_eq!(
        format_post(&RawNode::new(&as_string)).timestamp.as_deref(),
        Some("2020-01-01T00:00:01.000Z")
    );
}

#[test]
fn test_timestamp_zero_is_missing() {
    let node = json!({ "taken_at_timestamp": 0 });
    assert_eq!(format_post(&RawNode::new(&node)).timestamp, None);

    let zero_string = json!({ "taken_at_timestamp": "0" });
    assert_eq!(format_post(&RawNode::new(&zero_string)).timestamp, None);
}

#[test]
fn test_timestamp_fraction_truncated() {
    let as_string = json!({ "taken_at_timestamp": "1577836800.9" });
    assert_eq!(
        format_post(&RawNode::new(&as_string)).timestamp.as_deref(),
        Some("2020-01-01T00:00:00.000Z")
    );

    let as_float = json!({ "taken_at_timestamp": 1577836801.5 });
    assert_eq!(
        format_post(&RawNode::new(&as_float)).timestamp.as_deref(),
        Some("2020-01-01T00:00:01.000Z")
    );
}

#[test]
fn test_owner_and_location() {
    let node = json!({
        "shortcode": "B1x",
        "owner": { "id": "17", "username": "nasa", "full_name": "NASA" },
        "location": { "id": "213", "name": "Houston", "slug": "houston" },
        "is_ad": false
    });
    let post = format_post(&RawNode::new(&node));

    assert_eq!(post.url.as_deref(), Some("https://www.instagram.com/p/B1x"));
    assert_eq!(post.owner_id.as_deref(), Some("17"));
    assert_eq!(post.owner_username.as_deref(), Some("nasa"));
    assert_eq!(post.owner_full_name.as_deref(), Some("NASA"));
    assert_eq!(post.location_id.as_deref(), Some("213"));
    assert_eq!(post.location_name.as_deref(), Some("Houston"));
    assert_eq!(post.is_sponsored, Some(false));
}

#[test]
fn test_owner_null_short_circuits() {
    let node = json!({ "owner": null, "location": null });
    let post = format_post(&RawNode::new(&node));
    assert_eq!(post.owner_username, None);
    assert_eq!(post.location_name, None);
}

// ============================================================================
// Sidecar Tests
// ============================================================================

fn sidecar_post() -> Value {
    json!({
        "__typename": "GraphSidecar",
        "shortcode": "SC1",
        "edge_sidecar_to_children": {
            "edges": [
                { "node": { "__typename": "GraphImage", "display_url": "https://cdn/1.jpg" } },
                { "node": { "__typename": "GraphVideo", "display_url": "https://cdn/2.jpg", "is_video": true } }
            ]
        }
    })
}

#[test]
fn test_sidecar_images() {
    let node = sidecar_post();
    let post = format_post(&RawNode::new(&node));
    assert_eq!(post.images, vec!["https://cdn/1.jpg", "https://cdn/2.jpg"]);
}

#[test]
fn test_sidecar_images_filter_missing_urls() {
    let node = json!({
        "edge_sidecar_to_children": {
            "edges": [
                { "node": { "display_url": "" } },
                { "node": {} },
                { "node": { "display_url": "https://cdn/3.jpg" } }
            ]
        }
    });
    assert_eq!(format_post(&RawNode::new(&node)).images, vec!["https://cdn/3.jpg"]);
}

#[test]
fn test_sidecar_child_posts() {
    let node = sidecar_post();
    let detail = format_post_detail(&RawNode::new(&node), PostEnrichment::default(), debug_info());

    let children = detail.child_posts.unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].post_type, "Image");
    assert_eq!(children[1].post_type, "Video");
    for child in &children {
        assert_eq!(child.comments_count, None);
        assert!(child.latest_comments.is_empty());
        assert!(child.images.is_empty());
    }
    assert_eq!(detail.display_resource_urls.unwrap().len(), 2);
    assert_eq!(detail.post.images.len(), 2);
}

#[test]
fn test_post_detail_extras() {
    let node = json!({
        "shortcode": "abc",
        "caption_is_edited": true,
        "comments_disabled": false,
        "has_ranked_comments": true,
        "is_ad": false,
        "location": { "slug": "central-park" },
        "edge_media_to_tagged_user": {
            "edges": [
                { "node": { "user": { "username": "alice" } } },
                { "node": { "user": {} } },
                { "node": { "user": { "username": "bob" } } }
            ]
        }
    });
    let enrichment = PostEnrichment {
        liked_by: vec!["carol".to_string()],
    };
    let detail = format_post_detail(&RawNode::new(&node), enrichment, debug_info());

    assert_eq!(detail.caption_is_edited, Some(true));
    assert_eq!(detail.comments_disabled, Some(false));
    assert_eq!(detail.has_ranked_comments, Some(true));
    assert_eq!(detail.is_advertisement, Some(false));
    assert_eq!(detail.location_slug.as_deref(), Some("central-park"));
    assert_eq!(detail.tagged_users, vec!["alice", "bob"]);
    assert_eq!(detail.liked_by, vec!["carol"]);

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["shortCode"], json!("abc"));
    assert_eq!(json["#debug"]["requestId"], json!("req-1"));
}

// ============================================================================
// Profile, Place, Hashtag Tests
// ============================================================================

#[test]
fn test_format_profile() {
    let node = json!({
        "id": "528817151",
        "username": "nasa",
        "full_name": "NASA",
        "is_private": false,
        "is_verified": true,
        "profile_pic_url_hd": "https://cdn/hd.jpg",
        "has_public_story": true,
        "edge_followed_by": { "count": 1000 },
        "edge_follow": { "count": 10 },
        "edge_felix_video_timeline": {
            "count": 4,
            "edges": [ { "node": { "shortcode": "tv1", "video_duration": 12.5, "edge_liked_by": { "count": 3 } } } ]
        },
        "edge_owner_to_timeline_media": {
            "count": 3000,
            "edges": [ { "node": { "shortcode": "p1", "is_video": false } } ]
        }
    });
    let enrichment = ProfileEnrichment {
        following: vec!["esa".to_string()],
        followed_by: vec!["alice".to_string(), "bob".to_string()],
    };
    let profile = format_profile(&RawNode::new(&node), enrichment, debug_info());

    assert_eq!(profile.id.as_deref(), Some("528817151"));
    assert_eq!(profile.private, Some(false));
    assert_eq!(profile.verified, Some(true));
    assert_eq!(profile.followers_count, Some(1000));
    assert_eq!(profile.follows_count, Some(10));
    assert_eq!(profile.igtv_video_count, Some(4));
    assert_eq!(profile.latest_igtv_videos.len(), 1);
    assert_eq!(profile.latest_igtv_videos[0].video_duration, 12.5);
    assert_eq!(profile.latest_igtv_videos[0].likes_count, Some(3));
    assert_eq!(profile.posts_count, Some(3000));
    assert_eq!(profile.latest_posts[0].short_code.as_deref(), Some("p1"));
    assert_eq!(profile.following, vec!["esa"]);
    assert_eq!(profile.followed_by, vec!["alice", "bob"]);
    assert_eq!(profile.has_public_story, Some(true));
}

#[test]
fn test_format_place() {
    let node = json!({
        "id": "213",
        "name": "Central Park",
        "has_public_page": true,
        "lat": 40.78,
        "lng": -73.96,
        "blurb": "A park",
        "address_json": "{\"street_address\":\"1 Main St\",\"zip_code\":\"10001\"}",
        "edge_location_to_media": { "count": 50, "edges": [ { "node": { "shortcode": "a" } } ] },
        "edge_location_to_top_posts": { "edges": [ { "node": { "shortcode": "b" } }, { "node": { "shortcode": "c" } } ] }
    });
    let place = format_place(&RawNode::new(&node), debug_info());

    assert_eq!(place.public, Some(true));
    assert_eq!(place.lat, Some(40.78));
    assert_eq!(place.description.as_deref(), Some("A park"));
    assert_eq!(place.posts_count, Some(50));
    assert_eq!(place.latest_posts.len(), 1);
    assert_eq!(place.top_posts.len(), 2);

    let json = serde_json::to_value(&place).unwrap();
    assert_eq!(json["addressStreetAddress"], json!("1 Main St"));
    assert_eq!(json["addressZipCode"], json!("10001"));
}

#[test]
fn test_format_place_malformed_address() {
    let node = json!({ "address_json": "not json" });
    let place = format_place(&RawNode::new(&node), debug_info());
    assert!(place.address.is_empty());
}

#[test]
fn test_format_hashtag() {
    let node = json!({
        "id": "17843",
        "name": "rust",
        "is_top_media_only": false,
        "edge_hashtag_to_media": { "count": 120 },
        "edge_hashtag_to_top_posts": { "edges": [ { "node": { "__typename": "GraphVideo" } } ] }
    });
    let hashtag = format_hashtag(&RawNode::new(&node), debug_info());

    assert_eq!(hashtag.name.as_deref(), Some("rust"));
    assert_eq!(hashtag.top_posts_only, Some(false));
    assert_eq!(hashtag.posts_count, Some(120));
    assert!(hashtag.latest_posts.is_empty());
    assert_eq!(hashtag.top_posts[0].post_type, "Video");
}

// ============================================================================
// Purity Tests
// ============================================================================

#[test]
fn test_formatters_are_idempotent() {
    let node = sidecar_post();
    let raw = RawNode::new(&node);
    assert_eq!(format_post(&raw), format_post(&raw));

    let enrichment = PostEnrichment {
        liked_by: vec!["x".to_string()],
    };
    assert_eq!(
        format_post_detail(&raw, enrichment.clone(), debug_info()),
        format_post_detail(&raw, enrichment, debug_info())
    );
}
