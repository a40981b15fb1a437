pub mod users {
    pub const SELECT_FOR_IDENTITY: &str = r#"
    SELECT id
         , username
         , role
         , is_private
         , is_active
      FROM users
     WHERE id = ?
    "#;

    pub const SELECT_PRIVACY: &str = r#"
    SELECT id
         , is_private
         , role
      FROM users
     WHERE id = ?
    "#;

    pub const INSERT: &str = r#"
    INSERT INTO users (username, email, role, is_private)
    VALUES (?, ?, ?, ?)
    "#;
}

pub mod places {
    pub const INSERT: &str = r#"
    INSERT INTO places (name, latitude, longitude, categories)
    VALUES (?, ?, ?, ?)
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT id
         , name
         , latitude
         , longitude
         , categories
         , created_at
      FROM places
     WHERE id = ?
    "#;

    pub const CHECK_EXISTS: &str = r#"
    SELECT 1
      FROM places
     WHERE id = ?
    "#;
}

pub mod spots {
    pub const INSERT: &str = r#"
    INSERT INTO spots (user_id, place_id, rating, notes, tags, photos)
    VALUES (?, ?, ?, ?, ?, ?)
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT s.id
         , s.user_id
         , s.place_id
         , s.rating
         , s.notes
         , s.tags
         , s.photos
         , s.created_at
         , p.name
         , p.latitude
         , p.longitude
         , p.categories
      FROM spots AS s
      JOIN places AS p ON s.place_id = p.id
     WHERE s.id = ?
    "#;

    pub const SELECT_OWNER: &str = r#"
    SELECT user_id
      FROM spots
     WHERE id = ?
    "#;

    pub const CHECK_EXISTS_FOR_PLACE: &str = r#"
    SELECT 1
      FROM spots
     WHERE user_id = ?
       AND place_id = ?
    "#;

    pub const DELETE: &str = r#"
    DELETE FROM spots
     WHERE id = ?
    "#;
}

pub mod want_to_go {
    pub const INSERT: &str = r#"
    INSERT INTO want_to_go (user_id, place_id, notes)
    VALUES (?, ?, ?)
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT w.id
         , w.user_id
         , w.place_id
         , w.notes
         , w.created_at
         , p.name
         , p.latitude
         , p.longitude
         , p.categories
      FROM want_to_go AS w
      JOIN places AS p ON w.place_id = p.id
     WHERE w.id = ?
    "#;

    pub const SELECT_FOR_USER: &str = r#"
    SELECT w.id
         , w.user_id
         , w.place_id
         , w.notes
         , w.created_at
         , p.name
         , p.latitude
         , p.longitude
         , p.categories
      FROM want_to_go AS w
      JOIN places AS p ON w.place_id = p.id
     WHERE w.user_id = ?
     ORDER BY w.created_at DESC, w.id DESC
     LIMIT ? OFFSET ?
    "#;

    pub const COUNT_FOR_USER: &str = r#"
    SELECT COUNT(*)
      FROM want_to_go
     WHERE user_id = ?
    "#;

    pub const CHECK_EXISTS_FOR_PLACE: &str = r#"
    SELECT 1
      FROM want_to_go
     WHERE user_id = ?
       AND place_id = ?
    "#;

    pub const UPDATE_NOTES: &str = r#"
    UPDATE want_to_go
       SET notes = ?
     WHERE id = ?
    "#;

    pub const DELETE: &str = r#"
    DELETE FROM want_to_go
     WHERE id = ?
    "#;
}

pub mod follows {
    pub const SELECT_BY_PAIR: &str = r#"
    SELECT id
         , follower_id
         , followee_id
         , status
         , created_at
      FROM follows
     WHERE follower_id = ?
       AND followee_id = ?
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT id
         , follower_id
         , followee_id
         , status
         , created_at
      FROM follows
     WHERE id = ?
    "#;

    pub const UPSERT: &str = r#"
    INSERT INTO follows (follower_id, followee_id, status)
    VALUES (?, ?, ?)
    ON CONFLICT (follower_id, followee_id) DO UPDATE SET status = excluded.status
    "#;

    pub const UPDATE_STATUS: &str = r#"
    UPDATE follows
       SET status = ?
     WHERE id = ?
    "#;

    pub const DELETE: &str = r#"
    DELETE FROM follows
     WHERE id = ?
    "#;

    pub const SELECT_PENDING_FOR_FOLLOWEE: &str = r#"
    SELECT f.id
         , f.follower_id
         , u.username
         , u.profile_picture_url
         , f.created_at
      FROM follows AS f
      JOIN users AS u ON f.follower_id = u.id
     WHERE f.followee_id = ?
       AND f.status = 'pending'
     ORDER BY f.created_at DESC
    "#;

    pub const SELECT_ACTIVE_FOLLOWER_IDS: &str = r#"
    SELECT follower_id
      FROM follows
     WHERE followee_id = ?
       AND status = 'active'
    "#;
}

pub mod playlists {
    pub const INSERT: &str = r#"
    INSERT INTO playlists (user_id, title, description, cover_image_url, is_published)
    VALUES (?, ?, ?, ?, 0)
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT id
         , user_id
         , title
         , description
         , cover_image_url
         , is_published
         , created_at
      FROM playlists
     WHERE id = ?
    "#;

    pub const CHECK_OWNERSHIP: &str = r#"
    SELECT 1
      FROM playlists
     WHERE id = ?
       AND user_id = ?
    "#;

    pub const SELECT_FOR_USER: &str = r#"
    SELECT p.id
         , p.user_id
         , p.title
         , p.description
         , p.cover_image_url
         , p.is_published
         , p.created_at
         , (SELECT COUNT(*) FROM playlist_spots ps WHERE ps.playlist_id = p.id) AS spot_count
      FROM playlists AS p
     WHERE p.user_id = ?
     ORDER BY p.created_at DESC, p.id DESC
    "#;

    pub const SELECT_PUBLISHED_FOR_USER: &str = r#"
    SELECT p.id
         , p.user_id
         , p.title
         , p.description
         , p.cover_image_url
         , p.is_published
         , p.created_at
         , (SELECT COUNT(*) FROM playlist_spots ps WHERE ps.playlist_id = p.id) AS spot_count
      FROM playlists AS p
     WHERE p.user_id = ?
       AND p.is_published = 1
     ORDER BY p.created_at DESC, p.id DESC
    "#;

    pub const SELECT_WITH_COUNT: &str = r#"
    SELECT p.id
         , p.user_id
         , p.title
         , p.description
         , p.cover_image_url
         , p.is_published
         , p.created_at
         , (SELECT COUNT(*) FROM playlist_spots ps WHERE ps.playlist_id = p.id) AS spot_count
      FROM playlists AS p
     WHERE p.id = ?
    "#;

    pub const SET_PUBLISHED: &str = r#"
    UPDATE playlists
       SET is_published = 1
     WHERE id = ?
    "#;

    pub const DELETE: &str = r#"
    DELETE FROM playlists
     WHERE id = ?
    "#;

    pub const ADD_SPOT: &str = r#"
    INSERT OR IGNORE INTO playlist_spots (playlist_id, spot_id, display_order)
    VALUES (?, ?, ?)
    "#;

    pub const REMOVE_SPOT: &str = r#"
    DELETE FROM playlist_spots
     WHERE playlist_id = ?
       AND spot_id = ?
    "#;

    pub const SELECT_MAX_POSITION: &str = r#"
    SELECT MAX(display_order)
      FROM playlist_spots
     WHERE playlist_id = ?
    "#;

    pub const UPDATE_POSITION: &str = r#"
    UPDATE playlist_spots
       SET display_order = ?
     WHERE playlist_id = ?
       AND spot_id = ?
    "#;

    pub const SELECT_SPOTS: &str = r#"
    SELECT s.id
         , s.user_id
         , s.place_id
         , s.rating
         , s.notes
         , s.tags
         , s.photos
         , s.created_at
         , p.name
         , p.latitude
         , p.longitude
         , p.categories
      FROM playlist_spots AS ps
      JOIN spots AS s ON ps.spot_id = s.id
      JOIN places AS p ON s.place_id = p.id
     WHERE ps.playlist_id = ?
     ORDER BY ps.display_order ASC
    "#;
}

pub mod feed {
    pub const INSERT_ITEM: &str = r#"
    INSERT INTO feed_items (user_id, content_type, content_id, author_id)
    VALUES (?, ?, ?, ?)
    "#;

    pub const SELECT_FOR_USER: &str = r#"
    SELECT f.id
         , f.content_type
         , f.content_id
         , f.created_at
         , u.id
         , u.username
         , u.profile_picture_url
      FROM feed_items AS f
      JOIN users AS u ON f.author_id = u.id
     WHERE f.user_id = ?
     ORDER BY f.created_at DESC, f.id DESC
     LIMIT ?
    "#;

    pub const SELECT_FOR_USER_BEFORE: &str = r#"
    SELECT f.id
         , f.content_type
         , f.content_id
         , f.created_at
         , u.id
         , u.username
         , u.profile_picture_url
      FROM feed_items AS f
      JOIN users AS u ON f.author_id = u.id
     WHERE f.user_id = ?
       AND f.created_at < ?
     ORDER BY f.created_at DESC, f.id DESC
     LIMIT ?
    "#;

    pub const SELECT_SPOT_CONTENT: &str = r#"
    SELECT s.id
         , s.rating
         , s.notes
         , s.tags
         , s.photos
         , p.name
         , p.categories
      FROM spots AS s
      JOIN places AS p ON s.place_id = p.id
     WHERE s.id = ?
    "#;

    pub const SELECT_PLAYLIST_CONTENT: &str = r#"
    SELECT p.id
         , p.title
         , p.description
         , p.cover_image_url
         , (SELECT COUNT(*) FROM playlist_spots ps WHERE ps.playlist_id = p.id) AS spot_count
      FROM playlists AS p
     WHERE p.id = ?
    "#;
}

pub mod map {
    pub const SELECT_OWN_SPOTS_IN_BBOX: &str = r#"
    SELECT s.place_id
         , p.latitude
         , p.longitude
      FROM spots AS s
      JOIN places AS p ON s.place_id = p.id
     WHERE s.user_id = ?
       AND p.latitude BETWEEN ? AND ?
       AND p.longitude BETWEEN ? AND ?
    "#;

    pub const SELECT_OWN_WANT_TO_GO_IN_BBOX: &str = r#"
    SELECT w.place_id
         , p.latitude
         , p.longitude
      FROM want_to_go AS w
      JOIN places AS p ON w.place_id = p.id
     WHERE w.user_id = ?
       AND p.latitude BETWEEN ? AND ?
       AND p.longitude BETWEEN ? AND ?
    "#;

    pub const SELECT_ACTIVE_FOLLOWEE_IDS: &str = r#"
    SELECT followee_id
      FROM follows
     WHERE follower_id = ?
       AND status = 'active'
    "#;
}
