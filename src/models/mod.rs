// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AvailabilityWindow, BabysitterListing, BabysitterProfile, BookableInterval, ConnectionRequest,
    FamilyListing, Kid, Meeting, MeetingStatus, ParentProfile, RequestStatus, Review, User,
};
pub use requests::{
    BabysitterPatch, KidPatch, MeetingStatusUpdate, NewBabysitter, NewConnectionRequest, NewKid,
    NewMeetingRequest, NewParent, NewReview, NewWindow, ParentPatch, ProfilePatch,
    RegisterRequest, RequestActiveUpdate, RequestStatusUpdate, ReviewPatch, UserType, WindowPatch,
};
pub use responses::{
    AvailabilityResponse, ErrorResponse, HealthResponse, MessageResponse, ProfileResponse,
};
