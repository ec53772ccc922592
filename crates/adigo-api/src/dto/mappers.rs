//! Response DTO to entity mappers

use adigo_core::User;

use super::responses::UserDto;

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        let mut user = User::new(dto.id, dto.email, dto.nickname);
        user.profile_image = dto.profile_image;
        user.authority = dto.authority;
        user
    }
}
