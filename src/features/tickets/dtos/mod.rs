pub mod ticket_dto;

pub use ticket_dto::{
    AnalyzeTextRequestDto, AnalyzeTextResponseDto, CreateTicketRequestDto,
    CreateTicketResponseDto, ProcessTicketRequestDto, ProcessTicketResponseDto,
};
