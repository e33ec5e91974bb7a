use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, SettingFields};
use crate::DecodeStatus;

/// SETTINGS is a run of 6-byte parameter records; with the ACK flag the
/// payload must be empty instead.
#[derive(Debug, Default)]
pub struct SettingsPayloadDecoder {
    setting_fields: SettingFields,
}

impl SettingsPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *state.frame_header();
        debug_assert_eq!(header.kind, Kind::Settings);
        debug_assert!(buf.remaining() <= header.length as usize);

        if header.is_ack() {
            if header.length == 0 {
                listener.on_settings_ack(&header);
                return DecodeStatus::Done;
            }
            // The ACK flag on a non-empty SETTINGS frame; no settings are
            // reported.
            state.initialize_remainders();
            return state.report_frame_size_error(listener);
        }
        state.initialize_remainders();
        listener.on_settings_start(&header);
        self.decode_settings(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Settings);
        let status =
            state.resume_decoding_structure_in_payload(&mut self.setting_fields, buf, listener);
        if status == DecodeStatus::Done {
            listener.on_setting(&self.setting_fields);
            return self.decode_settings(state, buf, listener);
        }
        status
    }

    fn decode_settings<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        while state.remaining_payload() > 0 && buf.has_data() {
            let status =
                state.start_decoding_structure_in_payload(&mut self.setting_fields, buf, listener);
            if status != DecodeStatus::Done {
                return status;
            }
            listener.on_setting(&self.setting_fields);
        }
        if state.remaining_payload() == 0 {
            listener.on_settings_end();
            return DecodeStatus::Done;
        }
        DecodeStatus::InProgress
    }
}
