mod ids;
mod pagination;
mod playlist;
mod song;
mod user;

pub use ids::{PlaylistId, SongId, UserId};
pub use pagination::{Page, PageRequest, Pagination};
pub use playlist::{
    format_duration, CreatePlaylist, Playlist, PlaylistDetail, PlaylistStats, UpdatePlaylist,
};
pub use song::{NewSong, PopularSong, Song, UpdateSong};
pub use user::{NewUser, UpdateProfile, User, UserSummary};
